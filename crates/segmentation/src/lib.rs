//! Client segmentation — per-client value, reliability, growth, and risk
//! profiles, partitioned into independently evaluated cohorts.

pub mod clients;

pub use clients::{
    ClientProfile, ClientSegment, ClientSegmentationReport, GrowthTrend, RiskCensus, RiskTier,
    SegmentSummary,
};
