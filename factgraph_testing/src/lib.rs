//! # factgraph testing
//!
//! Fixture builders, result comparison and execution helpers for exercising
//! parsers and rules against canned content.

pub mod archive;
pub mod compare;
pub mod driver;
pub mod error;
pub mod harness;
pub mod input_data;
pub mod release;

pub use archive::{ArchiveCase, ArchiveProvider, ArchiveProviders, CaseIter, Comparator, GeneratedCase};
pub use compare::{unordered_compare, CompareError};
pub use driver::{context_wrap, integrate, run_input_data, run_test, ContextWrap};
pub use error::HarnessError;
pub use harness::{Harness, HarnessConfig, PathSequence};
pub use input_data::{FixtureContent, FixtureValue, InputData};
pub use release::{
    redhat_release, ReleaseError, ReleaseVersion, DEFAULT_HOSTNAME, DEFAULT_RELEASE, RHEL4, RHEL5,
    RHEL6, RHEL7,
};
