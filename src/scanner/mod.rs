//! Workspace scanning.
//!
//! Enumerates the files the discovery engine analyzes:
//!
//! - **Component files**: `*.tsx`/`*.ts`/`*.jsx`/`*.js` under the components
//!   directory, minus tests, stories, declarations, barrels and samples.
//! - **Sample files**: `*.sample.tsx` under the samples directory.
//!
//! # Example
//!
//! ```ignore
//! use docscope::config::DiscoveryConfig;
//! use docscope::scanner::WorkspaceScanner;
//!
//! let scanner = WorkspaceScanner::new(&DiscoveryConfig::for_root("."))?;
//! for path in scanner.scan_samples() {
//!     println!("{}", path.display());
//! }
//! ```

mod workspace;

pub use workspace::{
    sample_component_name, ScanError, ScanResult, WorkspaceScanner, COMPONENT_EXCLUDE,
    COMPONENT_INCLUDE, SAMPLE_INCLUDE, SAMPLE_SUFFIX,
};
