//! Sample-side discovery facade.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::analysis::{create_analyzer, SampleAnalysis};
use crate::cache::TtlCache;
use crate::config::DiscoveryConfig;
use crate::metadata::{synthesize_sample, SampleRecord};
use crate::ranking::{aggregate, PatternAggregate};
use crate::scanner::WorkspaceScanner;

use super::source::{analyze_or_neutral, read_source, scan_samples, SharedAnalyzer};
use super::{DiscoveryError, DiscoveryResult, SampleStatistics};

/// Finds, searches and analyzes `*.sample.tsx` usage files.
///
/// The whole sample cache is rebuilt together. Each sample is parsed once
/// per rebuild and its analysis kept on the record.
pub struct SampleDiscovery {
    scanner: WorkspaceScanner,
    analyzer: SharedAnalyzer,
    cache: TtlCache<SampleRecord>,
}

impl SampleDiscovery {
    pub fn new(config: DiscoveryConfig) -> DiscoveryResult<Self> {
        let analyzer = create_analyzer(config.analyzer, config.ui_kit_modules.clone())?;
        Ok(Self {
            scanner: WorkspaceScanner::new(&config)?,
            analyzer: Mutex::new(analyzer),
            cache: TtlCache::new(config.cache_ttl()),
        })
    }

    /// Builds the cache eagerly.
    pub async fn initialize(&self) -> DiscoveryResult<()> {
        self.ensure_fresh().await?;
        info!(samples = self.cache.len().await, "sample discovery initialized");
        Ok(())
    }

    /// Drops all cached samples.
    pub async fn dispose(&self) {
        self.cache.clear().await;
    }

    /// Every sample, in scan order.
    pub async fn discover_samples(&self) -> DiscoveryResult<Vec<SampleRecord>> {
        self.ensure_fresh().await?;
        Ok(self.cache.values().await.0)
    }

    /// The sample for component `name`, matched exactly and then
    /// case-insensitively.
    pub async fn get_sample_for_component(
        &self,
        name: &str,
    ) -> DiscoveryResult<Option<SampleRecord>> {
        self.ensure_fresh().await?;
        Ok(self.lookup(name).await.map(|(record, _)| record))
    }

    /// Samples whose component name, description, tags or content contain
    /// `query`, ignoring case.
    pub async fn search_samples(&self, query: &str) -> DiscoveryResult<Vec<SampleRecord>> {
        self.ensure_fresh().await?;
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let (records, _) = self.cache.values().await;
        let matches: Vec<SampleRecord> = records
            .into_iter()
            .filter(|s| {
                s.component_name.to_lowercase().contains(&query)
                    || s.description.to_lowercase().contains(&query)
                    || s.tags.iter().any(|t| t.contains(&query))
                    || s.content.to_lowercase().contains(&query)
            })
            .collect();
        debug!(query = %query, results = matches.len(), "sample search");
        Ok(matches)
    }

    /// Analysis of the sample for component `name`. Memoized per refresh.
    pub async fn get_sample_analysis(&self, name: &str) -> DiscoveryResult<SampleAnalysis> {
        self.ensure_fresh().await?;
        let (record, generation) = self
            .lookup(name)
            .await
            .ok_or_else(|| DiscoveryError::NotFound(name.to_string()))?;
        Ok(self.analysis_for(&record, generation).await)
    }

    /// Totals and breakdowns over all samples, analyzing any that lack it.
    pub async fn get_sample_statistics(&self) -> DiscoveryResult<SampleStatistics> {
        self.ensure_fresh().await?;
        let (records, generation) = self.cache.values().await;

        let mut stats = SampleStatistics {
            total_samples: records.len(),
            ..SampleStatistics::default()
        };
        let mut analyses = Vec::with_capacity(records.len());
        for record in &records {
            stats.total_size += record.size;
            let analysis = self.analysis_for(record, generation).await;
            *stats
                .counts_by_complexity
                .entry(analysis.complexity.to_string())
                .or_insert(0) += 1;
            *stats
                .counts_by_interactivity
                .entry(analysis.interactivity.to_string())
                .or_insert(0) += 1;
            analyses.push(analysis);
        }
        if stats.total_samples > 0 {
            stats.average_size = stats.total_size as f64 / stats.total_samples as f64;
        }

        let mut pattern_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for analysis in &analyses {
            for pattern in &analysis.patterns {
                *pattern_counts.entry(pattern.as_str()).or_insert(0) += 1;
            }
        }
        let mut ranked: Vec<(String, usize)> = pattern_counts
            .into_iter()
            .map(|(p, n)| (p.to_string(), n))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        stats.most_common_patterns = ranked;

        Ok(stats)
    }

    /// Aggregates usage patterns over `samples`.
    ///
    /// Samples from this facade's cache reuse their memoized analysis;
    /// others are analyzed from their content.
    pub async fn extract_usage_patterns(
        &self,
        samples: &[SampleRecord],
    ) -> DiscoveryResult<Vec<PatternAggregate>> {
        self.ensure_fresh().await?;
        let generation = self.cache.generation().await;

        let mut analyzed: Vec<(String, SampleAnalysis)> = Vec::with_capacity(samples.len());
        for sample in samples {
            let analysis = self.analysis_for(sample, generation).await;
            analyzed.push((sample.component_name.clone(), analysis));
        }
        Ok(aggregate(
            analyzed
                .iter()
                .map(|(component, analysis)| (component.as_str(), analysis)),
        ))
    }

    async fn ensure_fresh(&self) -> DiscoveryResult<()> {
        self.cache.ensure_fresh(|| self.load_records()).await?;
        Ok(())
    }

    async fn lookup(&self, name: &str) -> Option<(SampleRecord, u64)> {
        match self.cache.find(|s| s.component_name == name).await {
            Some(found) => Some(found),
            None => {
                self.cache
                    .find(|s| s.component_name.eq_ignore_ascii_case(name))
                    .await
            }
        }
    }

    /// One full refresh pass over the samples directory.
    async fn load_records(&self) -> DiscoveryResult<Vec<SampleRecord>> {
        let paths = scan_samples(&self.scanner).await?;
        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(file) = read_source(&path).await else {
                continue;
            };
            let facts = analyze_or_neutral(&self.analyzer, &path, &file.content).await;
            let modified = file.modified.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
            if let Some(mut record) =
                synthesize_sample(&path, &file.content, file.size, modified, &facts)
            {
                record.analysis = Some(SampleAnalysis::from(facts));
                records.push(record);
            }
        }
        Ok(records)
    }

    /// The analysis of `record`, computing and storing it if absent.
    ///
    /// Records from the cache already carry one; this only parses samples
    /// built elsewhere.
    async fn analysis_for(&self, record: &SampleRecord, generation: u64) -> SampleAnalysis {
        if let Some(analysis) = &record.analysis {
            return analysis.clone();
        }
        if let Some((cached, _)) = self.cache.get(&record.file_name).await {
            if cached.file_path == record.file_path {
                if let Some(analysis) = cached.analysis {
                    return analysis;
                }
            }
        }

        let facts = analyze_or_neutral(&self.analyzer, &record.file_path, &record.content).await;
        let analysis = SampleAnalysis::from(facts);
        self.cache
            .update_if_current(&record.file_name, generation, |cached| {
                if cached.file_path == record.file_path {
                    cached.analysis = Some(analysis.clone());
                }
            })
            .await;
        analysis
    }
}
