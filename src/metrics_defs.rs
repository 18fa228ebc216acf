//! Metrics definitions for the clan lookup service.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
}

impl MetricType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "Counter",
            MetricType::Gauge => "Gauge",
            MetricType::Histogram => "Histogram",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub description: &'static str,
}

pub const LOOKUP_REQUESTS: MetricDef = MetricDef {
    name: "lookup.requests",
    metric_type: MetricType::Counter,
    description: "Number of clan lookups served, tagged by endpoint and outcome",
};

pub const UPSTREAM_REQUESTS: MetricDef = MetricDef {
    name: "upstream.requests",
    metric_type: MetricType::Counter,
    description: "Number of GET requests issued to the upstream clan API",
};

pub const ALL_METRICS: &[MetricDef] = &[LOOKUP_REQUESTS, UPSTREAM_REQUESTS];
