use std::fmt;
use std::str::FromStr;

use recency_cache::BoundedRecencyCache;
use serde::Serialize;
use thiserror::Error;

pub const DEMO_CAPACITY: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseOpError {
    #[error("operation `{0}` is missing the `:` separator")]
    MissingSeparator(String),
    #[error("unknown operation `{0}`, expected put, get, peek or remove")]
    UnknownOperation(String),
    #[error("put needs KEY=VALUE, got `{0}`")]
    MissingValue(String),
    #[error("empty key in `{0}`")]
    EmptyKey(String),
}

/// One step of a replay script.
///
/// The textual form is `put:KEY=VALUE`, `get:KEY`, `peek:KEY` or
/// `remove:KEY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Put(String, String),
    Get(String),
    Peek(String),
    Remove(String),
}

impl FromStr for Op {
    type Err = ParseOpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = s
            .split_once(':')
            .ok_or_else(|| ParseOpError::MissingSeparator(s.to_string()))?;

        let key = |key: &str| {
            if key.is_empty() {
                Err(ParseOpError::EmptyKey(s.to_string()))
            } else {
                Ok(key.to_string())
            }
        };

        match name {
            "put" => {
                let (k, v) = arg
                    .split_once('=')
                    .ok_or_else(|| ParseOpError::MissingValue(s.to_string()))?;
                Ok(Op::Put(key(k)?, v.to_string()))
            }
            "get" => Ok(Op::Get(key(arg)?)),
            "peek" => Ok(Op::Peek(key(arg)?)),
            "remove" => Ok(Op::Remove(key(arg)?)),
            _ => Err(ParseOpError::UnknownOperation(name.to_string())),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Put(key, value) => write!(f, "put({key}, {value})"),
            Op::Get(key) => write!(f, "get({key})"),
            Op::Peek(key) => write!(f, "peek({key})"),
            Op::Remove(key) => write!(f, "remove({key})"),
        }
    }
}

/// What a single operation did to the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Outcome {
    Inserted,
    Replaced { previous: String },
    Evicted { key: String, value: String },
    Hit { value: String },
    Removed { value: String },
    Miss,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Inserted => f.write_str("inserted"),
            Outcome::Replaced { previous } => write!(f, "replaced {previous}"),
            Outcome::Evicted { key, value } => write!(f, "evicted ({key}, {value})"),
            Outcome::Hit { value } => write!(f, "hit {value}"),
            Outcome::Removed { value } => write!(f, "removed {value}"),
            Outcome::Miss => f.write_str("miss"),
        }
    }
}

/// The cache state after one operation, entries least recently used first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub op: String,
    pub outcome: Outcome,
    pub entries: Vec<(String, String)>,
}

impl Step {
    pub fn order(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} -> {}", self.op, self.outcome)?;
        let contents: Vec<String> = self
            .entries
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect();
        writeln!(f, "  contents: {{{}}}", contents.join(", "))?;
        write!(f, "  order:    [{}]", self.order().collect::<Vec<_>>().join(", "))
    }
}

/// put 1..3, touch key 2, then insert a fourth key into the full cache
pub fn demo_script() -> Vec<Op> {
    vec![
        Op::Put("1".into(), "A".into()),
        Op::Put("2".into(), "B".into()),
        Op::Put("3".into(), "C".into()),
        Op::Get("2".into()),
        Op::Put("4".into(), "D".into()),
    ]
}

pub fn apply(cache: &mut BoundedRecencyCache<String, String>, op: &Op) -> Outcome {
    match op {
        Op::Put(key, value) => match cache.push(key.clone(), value.clone()) {
            None => Outcome::Inserted,
            Some((old_key, previous)) if old_key == *key => Outcome::Replaced { previous },
            Some((key, value)) => Outcome::Evicted { key, value },
        },
        Op::Get(key) => cache
            .get(key)
            .map_or(Outcome::Miss, |value| Outcome::Hit {
                value: value.clone(),
            }),
        Op::Peek(key) => cache
            .peek(key)
            .map_or(Outcome::Miss, |value| Outcome::Hit {
                value: value.clone(),
            }),
        Op::Remove(key) => cache
            .remove(key)
            .map_or(Outcome::Miss, |value| Outcome::Removed { value }),
    }
}

/// Runs `ops` against a fresh cache of `capacity` entries and records the
/// state after each one.
pub fn replay(capacity: i64, ops: &[Op]) -> recency_cache::Result<Vec<Step>> {
    let mut cache = BoundedRecencyCache::new(capacity)?;
    let mut steps = Vec::with_capacity(ops.len());

    for op in ops {
        let outcome = apply(&mut cache, op);
        log::debug!("{op}: {outcome}");
        steps.push(Step {
            op: op.to_string(),
            outcome,
            entries: cache
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        });
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    use recency_cache::Error;
    use rstest::rstest;

    #[rstest]
    #[case("put:1=A", Op::Put("1".into(), "A".into()))]
    #[case("put:k=", Op::Put("k".into(), String::new()))]
    #[case("put:k=a=b", Op::Put("k".into(), "a=b".into()))]
    #[case("get:key", Op::Get("key".into()))]
    #[case("peek:2", Op::Peek("2".into()))]
    #[case("remove:x", Op::Remove("x".into()))]
    fn test_parse(#[case] input: &str, #[case] expected: Op) {
        assert_eq!(input.parse::<Op>(), Ok(expected));
    }

    #[rstest]
    #[case("get", ParseOpError::MissingSeparator("get".into()))]
    #[case("drop:1", ParseOpError::UnknownOperation("drop".into()))]
    #[case("put:1", ParseOpError::MissingValue("put:1".into()))]
    #[case("get:", ParseOpError::EmptyKey("get:".into()))]
    #[case("put:=A", ParseOpError::EmptyKey("put:=A".into()))]
    fn test_parse_errors(#[case] input: &str, #[case] expected: ParseOpError) {
        assert_eq!(input.parse::<Op>(), Err(expected));
    }

    #[test]
    fn test_demo_replay() {
        let steps = replay(DEMO_CAPACITY, &demo_script()).unwrap();
        assert_eq!(steps.len(), 5);

        let orders: Vec<Vec<&str>> = steps.iter().map(|step| step.order().collect()).collect();
        assert_eq!(
            orders,
            [
                vec!["1"],
                vec!["1", "2"],
                vec!["1", "2", "3"],
                vec!["1", "3", "2"],
                vec!["3", "2", "4"],
            ]
        );

        assert_eq!(
            steps[3].outcome,
            Outcome::Hit {
                value: "B".to_string()
            }
        );
        assert_eq!(
            steps[4].outcome,
            Outcome::Evicted {
                key: "1".to_string(),
                value: "A".to_string()
            }
        );
    }

    #[test]
    fn test_outcomes() {
        let ops: Vec<Op> = ["put:a=1", "put:a=2", "peek:a", "get:b", "remove:a", "remove:a"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let outcomes: Vec<Outcome> = replay(2, &ops)
            .unwrap()
            .into_iter()
            .map(|step| step.outcome)
            .collect();
        assert_eq!(
            outcomes,
            [
                Outcome::Inserted,
                Outcome::Replaced {
                    previous: "1".into()
                },
                Outcome::Hit { value: "2".into() },
                Outcome::Miss,
                Outcome::Removed { value: "2".into() },
                Outcome::Miss,
            ]
        );
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    fn test_replay_rejects_capacity(#[case] capacity: i64) {
        assert_eq!(replay(capacity, &[]), Err(Error::InvalidCapacity));
    }

    #[test]
    fn test_step_display() {
        let steps = replay(DEMO_CAPACITY, &demo_script()).unwrap();
        assert_eq!(
            steps[3].to_string(),
            "get(2) -> hit B\n  contents: {1: A, 3: C, 2: B}\n  order:    [1, 3, 2]"
        );
    }

    #[test]
    fn test_step_json() {
        let steps = replay(DEMO_CAPACITY, &demo_script()).unwrap();
        let json = serde_json::to_value(&steps[4]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "op": "put(4, D)",
                "outcome": { "kind": "evicted", "key": "1", "value": "A" },
                "entries": [["3", "C"], ["2", "B"], ["4", "D"]]
            })
        );
    }
}
