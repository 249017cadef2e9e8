//! The batch query source node configuration.
//!
//! A query node defines the shape and schedule of a batch query: how much
//! time each window spans, how often it runs, how the result is grouped and
//! filled. These fields are what the surrounding engine uses to seed scope
//! values before predicate evaluation; the querying itself happens
//! elsewhere.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// How missing points in the query result are filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    /// Suppress timestamps with no value.
    None,
    /// Report missing values as null (default behaviour).
    Null,
    /// Repeat the value of the previous window.
    Previous,
    /// Fill with a fixed number.
    Value(f64),
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Null
    }
}

/// A batch query definition and its schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryNode {
    /// The query text. Time conditions and group-by clauses are added
    /// dynamically from the fields below.
    pub query: String,
    /// The span of time each query covers.
    #[serde(with = "nanos")]
    pub period: TimeDelta,
    /// How often the query runs. Mutually exclusive with `cron`.
    #[serde(with = "nanos")]
    pub every: TimeDelta,
    /// Align window start and end times with the `every` boundary.
    pub align: bool,
    /// Cron schedule. Mutually exclusive with `every`.
    pub cron: Option<String>,
    /// How far back in time to shift each window.
    #[serde(with = "nanos")]
    pub offset: TimeDelta,
    /// Dimensions for the group-by clause.
    pub group_by: Vec<String>,
    /// Fill policy for missing points.
    pub fill: Fill,
    /// Named cluster to query; empty means the default cluster.
    pub cluster: Option<String>,
}

impl Default for QueryNode {
    fn default() -> Self {
        QueryNode {
            query: String::new(),
            period: TimeDelta::zero(),
            every: TimeDelta::zero(),
            align: false,
            cron: None,
            offset: TimeDelta::zero(),
            group_by: Vec::new(),
            fill: Fill::default(),
            cluster: None,
        }
    }
}

impl QueryNode {
    pub fn new(query: impl Into<String>) -> Self {
        QueryNode {
            query: query.into(),
            ..QueryNode::default()
        }
    }

    pub fn period(mut self, period: TimeDelta) -> Self {
        self.period = period;
        self
    }

    pub fn every(mut self, every: TimeDelta) -> Self {
        self.every = every;
        self
    }

    pub fn align(mut self) -> Self {
        self.align = true;
        self
    }

    pub fn cron(mut self, cron: impl Into<String>) -> Self {
        self.cron = Some(cron.into());
        self
    }

    pub fn offset(mut self, offset: TimeDelta) -> Self {
        self.offset = offset;
        self
    }

    pub fn group_by<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = dimensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    pub fn cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }
}

/// Durations serialize as whole nanoseconds.
mod nanos {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::value::duration;

    pub fn serialize<S: Serializer>(d: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration::nanos(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        i64::deserialize(deserializer).map(TimeDelta::nanoseconds)
    }
}
