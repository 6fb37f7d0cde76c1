//! Component-side discovery facade.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::analysis::{create_analyzer, PropUsage, VariantUsage};
use crate::cache::TtlCache;
use crate::config::DiscoveryConfig;
use crate::metadata::{synthesize_component, Catalog, ComponentRecord};
use crate::ranking::{rank_components, suggest, Suggestion, DEFAULT_SEARCH_LIMIT};
use crate::registry::{JsonFileRegistry, VersionRegistry};
use crate::scanner::WorkspaceScanner;

use super::source::{analyze_or_neutral, read_source, scan_components, SampleIndex, SharedAnalyzer};
use super::{ComponentFilter, ComponentStatistics, DiscoveryError, DiscoveryResult};

/// Observed usages of one component, taken from its sample file.
#[derive(Default)]
struct Usages {
    props: Vec<PropUsage>,
    variants: Vec<VariantUsage>,
}

/// Lists, searches and describes the published components of a workspace.
///
/// A component is published when a scanned source file matches an entry
/// in the version registry. Records are rebuilt from scratch whenever the
/// cache has been idle longer than the configured expiry window.
pub struct ComponentDiscovery {
    scanner: WorkspaceScanner,
    registry: Arc<dyn VersionRegistry>,
    catalog: Catalog,
    analyzer: SharedAnalyzer,
    cache: TtlCache<ComponentRecord>,
}

impl ComponentDiscovery {
    /// Creates a facade reading the registry file named by `config`.
    pub fn new(config: DiscoveryConfig) -> DiscoveryResult<Self> {
        let registry = Arc::new(JsonFileRegistry::new(config.registry_file()));
        Self::with_registry(config, registry)
    }

    /// Creates a facade with an explicit registry provider.
    pub fn with_registry(
        config: DiscoveryConfig,
        registry: Arc<dyn VersionRegistry>,
    ) -> DiscoveryResult<Self> {
        let catalog = match config.catalog_file() {
            Some(path) => Catalog::from_file(&path)
                .map_err(|source| DiscoveryError::Catalog { path, source })?,
            None => Catalog::builtin(),
        };
        let analyzer = create_analyzer(config.analyzer, config.ui_kit_modules.clone())?;

        Ok(Self {
            scanner: WorkspaceScanner::new(&config)?,
            registry,
            catalog,
            analyzer: Mutex::new(analyzer),
            cache: TtlCache::new(config.cache_ttl()),
        })
    }

    /// Builds the cache eagerly.
    pub async fn initialize(&self) -> DiscoveryResult<()> {
        self.ensure_fresh().await?;
        info!(components = self.cache.len().await, "component discovery initialized");
        Ok(())
    }

    /// Drops all cached records.
    pub async fn dispose(&self) {
        self.cache.clear().await;
    }

    /// Components passing `filter`, in scan order.
    pub async fn list_components(
        &self,
        filter: &ComponentFilter,
    ) -> DiscoveryResult<Vec<ComponentRecord>> {
        self.ensure_fresh().await?;
        let (records, generation) = self.cache.values().await;

        let mut matching: Vec<ComponentRecord> =
            records.into_iter().filter(|r| filter.matches(r)).collect();
        if let Some(limit) = filter.limit {
            matching.truncate(limit);
        }
        self.enrich(matching, filter, generation).await
    }

    /// Components ranked by relevance to `query`.
    pub async fn search_components(
        &self,
        query: &str,
        filter: &ComponentFilter,
    ) -> DiscoveryResult<Vec<ComponentRecord>> {
        self.ensure_fresh().await?;
        let (records, generation) = self.cache.values().await;

        let candidates: Vec<ComponentRecord> =
            records.into_iter().filter(|r| filter.matches(r)).collect();
        let ranked = rank_components(
            candidates,
            query,
            filter.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        );
        debug!(query, results = ranked.len(), "component search");
        self.enrich(ranked, filter, generation).await
    }

    /// Looks a component up by name, exactly and then case-insensitively.
    pub async fn get_component_by_name(
        &self,
        name: &str,
    ) -> DiscoveryResult<Option<ComponentRecord>> {
        self.ensure_fresh().await?;
        Ok(self.lookup(name).await.map(|(record, _)| record))
    }

    /// Props observed on `name` in its sample file. Memoized per refresh.
    pub async fn get_component_props(&self, name: &str) -> DiscoveryResult<Vec<PropUsage>> {
        self.ensure_fresh().await?;
        let (record, generation) = self
            .lookup(name)
            .await
            .ok_or_else(|| DiscoveryError::NotFound(name.to_string()))?;
        let samples = self.samples_for(std::slice::from_ref(&record)).await?;
        let record = self.with_usages(record, generation, &samples).await;
        Ok(record.props.unwrap_or_default())
    }

    /// Variants observed on `name` in its sample file. Memoized per refresh.
    pub async fn get_component_variants(
        &self,
        name: &str,
    ) -> DiscoveryResult<Vec<VariantUsage>> {
        self.ensure_fresh().await?;
        let (record, generation) = self
            .lookup(name)
            .await
            .ok_or_else(|| DiscoveryError::NotFound(name.to_string()))?;
        let samples = self.samples_for(std::slice::from_ref(&record)).await?;
        let record = self.with_usages(record, generation, &samples).await;
        Ok(record.variants.unwrap_or_default())
    }

    /// Components that fit a free-text use case and requirement list.
    pub async fn suggest_components(
        &self,
        use_case: &str,
        requirements: &[String],
    ) -> DiscoveryResult<Vec<Suggestion>> {
        self.ensure_fresh().await?;
        let (records, _) = self.cache.values().await;
        Ok(suggest(&records, use_case, requirements))
    }

    /// Totals and breakdowns over all components.
    ///
    /// Computes observed usages for every component that lacks them.
    pub async fn get_statistics(&self) -> DiscoveryResult<ComponentStatistics> {
        self.ensure_fresh().await?;
        let (records, generation) = self.cache.values().await;
        let filter = ComponentFilter::default().with_props().with_variants();
        let records = self.enrich(records, &filter, generation).await?;

        let mut stats = ComponentStatistics {
            total: records.len(),
            ..ComponentStatistics::default()
        };
        let mut prop_names = 0usize;
        for record in &records {
            *stats
                .counts_by_category
                .entry(record.category.clone())
                .or_insert(0) += 1;
            *stats
                .counts_by_status
                .entry(record.status.clone())
                .or_insert(0) += 1;

            if let Some(props) = &record.props {
                let distinct: BTreeSet<&str> = props.iter().map(|p| p.name.as_str()).collect();
                prop_names += distinct.len();
            }
            if record.variants.as_ref().is_some_and(|v| !v.is_empty()) {
                stats.components_with_variants += 1;
            }
        }
        if stats.total > 0 {
            stats.average_props_per_component = prop_names as f64 / stats.total as f64;
        }
        Ok(stats)
    }

    async fn ensure_fresh(&self) -> DiscoveryResult<()> {
        self.cache.ensure_fresh(|| self.load_records()).await?;
        Ok(())
    }

    async fn lookup(&self, name: &str) -> Option<(ComponentRecord, u64)> {
        match self.cache.get(name).await {
            Some(found) => Some(found),
            None => {
                self.cache
                    .find(|r| r.name.eq_ignore_ascii_case(name))
                    .await
            }
        }
    }

    /// One full refresh pass: registry, scan, then per-file synthesis.
    async fn load_records(&self) -> DiscoveryResult<Vec<ComponentRecord>> {
        let registry = Arc::clone(&self.registry);
        let snapshot = tokio::task::spawn_blocking(move || registry.load()).await??;
        if snapshot.is_empty() {
            warn!("version registry is empty, no components will be published");
        }

        let paths = scan_components(&self.scanner).await?;
        let mut records = Vec::new();
        for path in paths {
            let Some(entry) = snapshot.find_by_path(&path) else {
                debug!(path = %path.display(), "not in registry, skipping");
                continue;
            };
            let Some(file) = read_source(&path).await else {
                continue;
            };
            let facts = analyze_or_neutral(&self.analyzer, &path, &file.content).await;
            records.push(synthesize_component(
                &path,
                &facts,
                entry,
                &self.catalog,
                file.modified,
            ));
        }
        Ok(records)
    }

    /// Fills in props and variants when `filter` asks for them.
    async fn enrich(
        &self,
        records: Vec<ComponentRecord>,
        filter: &ComponentFilter,
        generation: u64,
    ) -> DiscoveryResult<Vec<ComponentRecord>> {
        if !filter.needs_usages() {
            return Ok(records);
        }
        let samples = self.samples_for(&records).await?;
        let mut enriched = Vec::with_capacity(records.len());
        for record in records {
            let mut record = self.with_usages(record, generation, &samples).await;
            if !filter.include_props {
                record.props = None;
            }
            if !filter.include_variants {
                record.variants = None;
            }
            enriched.push(record);
        }
        Ok(enriched)
    }

    /// Scans the samples directory when any of `records` still lacks usages.
    async fn samples_for(&self, records: &[ComponentRecord]) -> DiscoveryResult<SampleIndex> {
        if records.iter().all(has_usages) {
            return Ok(SampleIndex::default());
        }
        let index = SampleIndex::scan(&self.scanner).await?;
        debug!(samples = index.len(), "indexed sample files");
        Ok(index)
    }

    /// Returns `record` with usages, computing and memoizing them if absent.
    async fn with_usages(
        &self,
        mut record: ComponentRecord,
        generation: u64,
        samples: &SampleIndex,
    ) -> ComponentRecord {
        if has_usages(&record) {
            return record;
        }

        let usages = self.observe_usages(&record, samples).await;
        let stored = self
            .cache
            .update_if_current(&record.name, generation, |cached| {
                cached.props = Some(usages.props.clone());
                cached.variants = Some(usages.variants.clone());
            })
            .await;
        if !stored {
            debug!(component = %record.name, "cache rebuilt while computing usages");
        }

        record.props = Some(usages.props);
        record.variants = Some(usages.variants);
        record
    }

    /// Analyzes the component's sample file and keeps usages on its tags.
    async fn observe_usages(&self, record: &ComponentRecord, samples: &SampleIndex) -> Usages {
        let Some(path) = samples.find(&record.name) else {
            debug!(component = %record.name, "no sample file");
            return Usages::default();
        };
        let Some(file) = read_source(path).await else {
            return Usages::default();
        };

        let facts = analyze_or_neutral(&self.analyzer, path, &file.content).await;
        Usages {
            props: facts
                .prop_usages
                .into_iter()
                .filter(|p| record.answers_to(&p.component))
                .collect(),
            variants: facts
                .variant_usages
                .into_iter()
                .filter(|v| record.answers_to(&v.component))
                .collect(),
        }
    }
}

fn has_usages(record: &ComponentRecord) -> bool {
    record.props.is_some() && record.variants.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{RegistryEntry, StaticRegistry};
    use std::fs;
    use std::path::Path;

    const BUTTON_SOURCE: &str = r#"
import * as React from "react";
export function Button(props) { return <button {...props} />; }
export const buttonVariants = {};
"#;

    const BUTTON_SAMPLE: &str = r#"
import { Button } from '@/components/ui/button';
export default function Sample() {
  return (
    <div>
      <Button variant="outline" size="sm" onClick={save}>Save</Button>
      <Button disabled>Wait</Button>
    </div>
  );
}
"#;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn workspace() -> (tempfile::TempDir, ComponentDiscovery) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("app");
        write(&root, "src/components/ui/button.tsx", BUTTON_SOURCE);
        write(&root, "src/components/ui/card.tsx", "export function Card() { return <div />; }");
        write(&root, "src/components/ui/secret.tsx", "export function Secret() {}");
        write(&root, "samples/Button.sample.tsx", BUTTON_SAMPLE);

        let registry = StaticRegistry::new(vec![
            RegistryEntry::new("Button", "src/components/ui/button.tsx", "1.0.0"),
            RegistryEntry::new("Card", "src/components/ui/card.tsx", "0.3.0")
                .with_status("beta"),
        ]);
        let config = DiscoveryConfig::for_root(&root).with_samples_dir(root.join("samples"));
        let discovery = ComponentDiscovery::with_registry(config, Arc::new(registry)).unwrap();
        (dir, discovery)
    }

    #[tokio::test]
    async fn test_only_registered_components_listed() {
        let (_dir, discovery) = workspace();
        let all = discovery
            .list_components(&ComponentFilter::default())
            .await
            .unwrap();
        let names: Vec<_> = all.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Button", "Card"]);
        assert_eq!(all[0].exports, vec!["Button", "buttonVariants"]);
    }

    #[tokio::test]
    async fn test_filter_by_status_and_limit() {
        let (_dir, discovery) = workspace();
        let beta = discovery
            .list_components(&ComponentFilter::default().with_status("beta"))
            .await
            .unwrap();
        assert_eq!(beta.len(), 1);
        assert_eq!(beta[0].name, "Card");

        let limited = discovery
            .list_components(&ComponentFilter::default().with_limit(1))
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_props_and_variants_from_sample() {
        let (_dir, discovery) = workspace();
        let props = discovery.get_component_props("Button").await.unwrap();
        let names: Vec<_> = props.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["variant", "size", "onClick", "disabled"]);

        let variants = discovery.get_component_variants("button").await.unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].variant_name, "variant");
        assert_eq!(variants[0].value, "outline");
    }

    #[tokio::test]
    async fn test_unknown_component_is_not_found() {
        let (_dir, discovery) = workspace();
        let err = discovery.get_component_props("Nope").await.unwrap_err();
        assert!(matches!(err, DiscoveryError::NotFound(name) if name == "Nope"));
        assert!(discovery
            .get_component_variants("Nope")
            .await
            .is_err());
        assert!(discovery.get_component_by_name("Nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_component_without_sample_has_no_usages() {
        let (_dir, discovery) = workspace();
        assert!(discovery.get_component_props("Card").await.unwrap().is_empty());
        let card = discovery.get_component_by_name("Card").await.unwrap().unwrap();
        assert_eq!(card.props, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_statistics() {
        let (_dir, discovery) = workspace();
        let stats = discovery.get_statistics().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.counts_by_status.get("stable"), Some(&1));
        assert_eq!(stats.counts_by_status.get("beta"), Some(&1));
        assert_eq!(stats.counts_by_category.get("form"), Some(&1));
        assert_eq!(stats.counts_by_category.get("layout"), Some(&1));
        assert_eq!(stats.components_with_variants, 1);
        assert!((stats.average_props_per_component - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_one_sample_index_serves_every_component() {
        let (dir, discovery) = workspace();
        write(
            &dir.path().join("app"),
            "samples/Card.sample.tsx",
            "export default () => <Card variant=\"elevated\" title=\"Hi\" />;",
        );

        discovery.ensure_fresh().await.unwrap();
        let (records, _) = discovery.cache.values().await;
        let index = discovery.samples_for(&records).await.unwrap();
        assert_eq!(index.len(), 2);

        let stats = discovery.get_statistics().await.unwrap();
        assert_eq!(stats.components_with_variants, 2);
        let card = discovery.get_component_variants("Card").await.unwrap();
        assert_eq!(card.len(), 1);
        assert_eq!(card[0].value, "elevated");
    }

    #[tokio::test]
    async fn test_memoized_usages_skip_sample_scan() {
        let (_dir, discovery) = workspace();
        discovery.get_statistics().await.unwrap();

        let (records, _) = discovery.cache.values().await;
        assert!(records.iter().all(has_usages));
        let index = discovery.samples_for(&records).await.unwrap();
        assert_eq!(index.len(), 0);
    }

    #[tokio::test]
    async fn test_dispose_then_reload() {
        let (_dir, discovery) = workspace();
        discovery.initialize().await.unwrap();
        discovery.dispose().await;
        let all = discovery
            .list_components(&ComponentFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }
}
