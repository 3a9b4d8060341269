use serde::Serialize;
use std::fmt;

/// Whether an operation writes or reads records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Write,
    Read,
}

/// How the N single-record operations are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One call after another.
    Serial,
    /// All N calls at once, joined before responding.
    Parallel,
    /// One batched call carrying all N keys.
    Multi,
}

/// The unit of work behind each harness endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    PutSerial,
    PutParallel,
    PutMulti,
    GetSerial,
    GetSerialWithQuery,
    GetParallel,
    GetMulti,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::PutSerial,
        Operation::PutParallel,
        Operation::PutMulti,
        Operation::GetSerial,
        Operation::GetSerialWithQuery,
        Operation::GetParallel,
        Operation::GetMulti,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Operation::PutSerial => "/putSerial",
            Operation::PutParallel => "/putParallel",
            Operation::PutMulti => "/putMulti",
            Operation::GetSerial => "/getSerial",
            Operation::GetSerialWithQuery => "/getSerialWithQuery",
            Operation::GetParallel => "/getParallel",
            Operation::GetMulti => "/getMulti",
        }
    }

    pub fn mode(self) -> Mode {
        match self {
            Operation::PutSerial | Operation::PutParallel | Operation::PutMulti => Mode::Write,
            _ => Mode::Read,
        }
    }

    pub fn strategy(self) -> Strategy {
        match self {
            Operation::PutSerial | Operation::GetSerial | Operation::GetSerialWithQuery => {
                Strategy::Serial
            }
            Operation::PutParallel | Operation::GetParallel => Strategy::Parallel,
            Operation::PutMulti | Operation::GetMulti => Strategy::Multi,
        }
    }

    /// Reads that locate records with a predicate query instead of by key.
    pub fn uses_query(self) -> bool {
        matches!(self, Operation::GetSerialWithQuery)
    }

    /// Closing log line, one per request.
    pub fn finished_message(self) -> &'static str {
        match self {
            Operation::PutSerial => "datastore serial put finished",
            Operation::PutParallel => "datastore parallel put finished",
            Operation::PutMulti => "datastore putmulti finished",
            Operation::GetSerial => "datastore serial get finished",
            Operation::GetSerialWithQuery => "datastore serial get with query finished",
            Operation::GetParallel => "datastore parallel get finished",
            Operation::GetMulti => "datastore multi get finished",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}
