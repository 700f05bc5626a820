use clap::Parser;
use recency_tools::{demo_script, replay, Op, DEMO_CAPACITY};

/// replay put/get operations against a bounded recency cache, printing its
/// contents and recency order after every step
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// maximum number of entries held by the cache
    #[arg(short, long, default_value_t = DEMO_CAPACITY, allow_negative_numbers = true)]
    capacity: i64,

    /// print one JSON object per step instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// operations to run: put:KEY=VALUE, get:KEY, peek:KEY or remove:KEY.
    /// Without any, the built-in demo is replayed
    ops: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let ops = if args.ops.is_empty() {
        log::info!("no operations given, replaying the demo script");
        demo_script()
    } else {
        args.ops
            .iter()
            .map(|op| op.parse())
            .collect::<Result<Vec<Op>, _>>()?
    };

    let steps = replay(args.capacity, &ops)?;
    for step in &steps {
        if args.json {
            println!("{}", serde_json::to_string(step)?);
        } else {
            println!("{step}");
        }
    }
    log::info!("replayed {} operations", steps.len());
    Ok(())
}
