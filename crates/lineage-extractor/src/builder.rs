//! Graph builder - turns a report reference into a fully linked report
//!
//! A builder is single-threaded and owns its memos: metric and attribute
//! definitions built once are shared by every later dataset that uses them.
//! Every recoverable problem becomes a [`Diagnostic`]; only unreadable
//! documents abort a report.

use crate::corpus::Corpus;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::Result;
use crate::fields::attribute::read_attribute_forms;
use crate::fields::dataset::{
    is_view_report, read_chart_type, read_rows_columns, read_template_objects, DatasetObjects,
};
use crate::fields::fact::read_fact;
use crate::fields::metric::{embedded_metric_links, read_metric, FormulaRef, Referent};
use crate::fields::report::{read_report_datasets, DatasetRef};
use crate::links::DocLink;
use crate::locale::IndexKind;
use crate::metrics::ExtractionMetrics;
use crate::resolver::{LinkResolver, LinkResult};
use lineage_document::{DocumentTree, NodeId, SectionKey};
use lineage_domain::traits::ReportExtractor;
use lineage_domain::{
    Attribute, AttributeDefinition, AttributeForm, Dataset, DatasetKind, Fact, FileRef, Function,
    LogicTable, Metric, MetricDefinition, MetricKind, ObjectId, Report, ReportRef,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Metric ids on the current recursion path, outermost first
///
/// Passed by value; each child gets its own extended copy, so sibling
/// branches never see each other's entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitingSet {
    path: Vec<ObjectId>,
}

impl VisitingSet {
    /// An empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is already on the path
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.path.contains(id)
    }

    /// A copy extended with `id`
    pub fn with(&self, id: &ObjectId) -> Self {
        let mut next = self.clone();
        next.path.push(id.clone());
        next
    }

    /// Path depth
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether the path is empty
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// The path rendered as `A -> B -> C`
    pub fn chain(&self) -> String {
        self.path
            .iter()
            .map(ObjectId::as_str)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// An indexed object to build: its id, index name and defining document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Object id, used as the section anchor
    pub id: ObjectId,
    /// Official name from the index
    pub name: String,
    /// Defining document
    pub file: FileRef,
}

impl Target {
    fn from_link(found: LinkResult, fallback_id: Option<&ObjectId>) -> Self {
        let id = found
            .object_id()
            .or_else(|| fallback_id.cloned())
            .unwrap_or_else(|| ObjectId::derive([found.file.href().as_str(), found.name.as_str()]));
        Self {
            id,
            name: found.name,
            file: found.file,
        }
    }
}

/// Builds report graphs against one corpus
#[derive(Debug)]
pub struct GraphBuilder {
    corpus: Corpus,
    resolvers: HashMap<IndexKind, Option<Arc<LinkResolver>>>,
    metric_memo: HashMap<(ObjectId, String), Arc<MetricDefinition>>,
    attribute_memo: HashMap<(ObjectId, String), Arc<AttributeDefinition>>,
    function_memo: HashMap<ObjectId, Arc<Function>>,
    fact_memo: HashMap<ObjectId, Arc<Fact>>,
    diagnostics: Vec<Diagnostic>,
    metrics: ExtractionMetrics,
}

impl GraphBuilder {
    /// Create a builder with empty memos
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus,
            resolvers: HashMap::new(),
            metric_memo: HashMap::new(),
            attribute_memo: HashMap::new(),
            function_memo: HashMap::new(),
            fact_memo: HashMap::new(),
            diagnostics: Vec::new(),
            metrics: ExtractionMetrics::new(),
        }
    }

    /// The corpus this builder reads
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Diagnostics recorded so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Counters recorded so far
    pub fn metrics(&self) -> &ExtractionMetrics {
        &self.metrics
    }

    /// Give up the builder, keeping its counters
    pub fn into_metrics(self) -> ExtractionMetrics {
        self.metrics
    }

    /// Number of memoized metric definitions
    pub fn memoized_metrics(&self) -> usize {
        self.metric_memo.len()
    }

    fn diagnose(&mut self, kind: DiagnosticKind, message: String) {
        warn!("{}: {}", kind, message);
        self.metrics.record_diagnostic(kind);
        self.diagnostics.push(Diagnostic::new(kind, message));
    }

    /// Resolver over an index, built on first use
    ///
    /// A missing index is diagnosed once and treated as empty from then on.
    fn resolver(&mut self, kind: IndexKind) -> Result<Option<Arc<LinkResolver>>> {
        if let Some(cached) = self.resolvers.get(&kind) {
            return Ok(cached.clone());
        }
        let resolver = match self.corpus.resolver(kind) {
            Ok(resolver) => Some(Arc::new(resolver)),
            Err(e) if e.is_missing() => {
                self.diagnose(DiagnosticKind::MissingSource, format!("{} index: {}", kind, e));
                None
            }
            Err(e) => return Err(e.into()),
        };
        self.resolvers.insert(kind, resolver.clone());
        Ok(resolver)
    }

    fn resolve(
        &mut self,
        kind: IndexKind,
        id: Option<&ObjectId>,
        name: Option<&str>,
    ) -> Result<Option<LinkResult>> {
        Ok(self
            .resolver(kind)?
            .and_then(|resolver| resolver.resolve(id, name)))
    }

    fn load(&mut self, file: &str) -> Result<Option<Arc<DocumentTree>>> {
        match self.corpus.document(file) {
            Ok(doc) => Ok(Some(doc)),
            Err(e) if e.is_missing() => {
                self.diagnose(DiagnosticKind::MissingSource, e.to_string());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn locate(
        &mut self,
        doc: &DocumentTree,
        anchor: Option<&str>,
        name: &str,
        file: &str,
    ) -> Option<NodeId> {
        let found = self
            .corpus
            .locator()
            .locate(doc, SectionKey::new(anchor, Some(name)));
        if found.is_none() {
            self.diagnose(
                DiagnosticKind::SectionNotFound,
                format!("{} (anchor {}) in {}", name, anchor.unwrap_or("-"), file),
            );
        }
        found.map(|s| s.root)
    }

    /// Extract one report with all of its datasets
    ///
    /// A missing report document or section yields a report without
    /// datasets; an unreadable document is an error.
    pub fn extract(&mut self, reference: &ReportRef) -> Result<Report> {
        let id = reference.id.clone().unwrap_or_else(|| {
            debug!("Report {} has no id, deriving one", reference.name);
            ObjectId::derive([reference.file.href().as_str(), reference.name.as_str()])
        });
        let mut report = Report {
            name: reference.name.clone(),
            id: id.clone(),
            file: reference.file.clone(),
            datasets: Vec::new(),
        };

        let anchor = reference
            .id
            .as_ref()
            .map(|i| i.as_str().to_string())
            .or_else(|| reference.file.anchor.clone());
        let refs = match self.load(&reference.file.file)? {
            Some(doc) => match self.locate(&doc, anchor.as_deref(), &reference.name, &reference.file.file) {
                Some(section) => read_report_datasets(&doc, section, self.corpus.locale()),
                None => Vec::new(),
            },
            None => Vec::new(),
        };
        debug!("Report {} lists {} datasets", reference.name, refs.len());

        for dataset in &refs {
            report.datasets.push(self.dataset(dataset, &id)?);
        }
        self.metrics.record_report(report.datasets.len());
        Ok(report)
    }

    /// First dataset index (cube, report, shortcut) that knows the reference
    fn classify_dataset(&mut self, reference: &DatasetRef) -> Result<Option<(IndexKind, LinkResult)>> {
        for kind in IndexKind::DATASET_SOURCES {
            let found = self
                .resolver(kind)?
                .and_then(|r| r.resolve_strict(reference.id.as_ref(), Some(reference.name.as_str())));
            if let Some(found) = found {
                return Ok(Some((kind, found)));
            }
        }
        Ok(None)
    }

    fn dataset(&mut self, reference: &DatasetRef, report_id: &ObjectId) -> Result<Dataset> {
        let Some((index, found)) = self.classify_dataset(reference)? else {
            self.diagnose(
                DiagnosticKind::LinkUnresolved,
                format!("dataset {} not in any dataset index", reference.name),
            );
            let id = reference.id.clone().unwrap_or_else(|| {
                let href = reference.file.as_ref().map(FileRef::href).unwrap_or_default();
                ObjectId::derive([href.as_str(), reference.name.as_str()])
            });
            return Ok(Dataset::empty(
                &reference.name,
                id,
                report_id.clone(),
                DatasetKind::Unresolved,
                reference.file.clone(),
            ));
        };

        let target = Target::from_link(found, reference.id.as_ref());
        let base_kind = match index {
            IndexKind::Cube => DatasetKind::TabularCube,
            IndexKind::Shortcut => DatasetKind::Shortcut,
            _ => DatasetKind::AdHocReport { chart_type: None },
        };
        let mut dataset = Dataset::empty(
            &reference.name,
            target.id.clone(),
            report_id.clone(),
            base_kind,
            Some(target.file.clone()),
        );
        if !dataset.kind.is_extractable() {
            debug!("Dataset {} is a shortcut, skipping contents", reference.name);
            return Ok(dataset);
        }

        let Some(doc) = self.load(&target.file.file)? else {
            return Ok(dataset);
        };
        let Some(section) = self.locate(&doc, Some(target.id.as_str()), &target.name, &target.file.file) else {
            return Ok(dataset);
        };

        let locale = self.corpus.locale();
        let window = self.corpus.config().template_search_window;
        let ad_hoc = is_view_report(&doc, section, locale) || index != IndexKind::Cube;
        let objects = if ad_hoc {
            dataset.kind = DatasetKind::AdHocReport {
                chart_type: read_chart_type(&doc, section, locale),
            };
            read_rows_columns(&doc, section, locale)
                .unwrap_or_else(|| read_template_objects(&doc, section, locale, window))
        } else {
            read_template_objects(&doc, section, locale, window)
        };
        debug!(
            "Dataset {} ({}): {} attribute links, {} metric links",
            dataset.name,
            dataset.kind.label(),
            objects.attributes.len(),
            objects.metrics.len()
        );

        self.fill_dataset(&mut dataset, objects)?;
        Ok(dataset)
    }

    fn fill_dataset(&mut self, dataset: &mut Dataset, objects: DatasetObjects) -> Result<()> {
        for link in &objects.attributes {
            if let Some(attribute) = self.attribute(link, &dataset.id)? {
                dataset.attributes.push(attribute);
            }
        }
        for link in &objects.metrics {
            if let Some(metric) = self.dataset_metric(link, &dataset.id)? {
                dataset.metrics.push(metric);
            }
        }
        Ok(())
    }

    /// Resolve a dataset-local attribute reference and scope it to the dataset
    pub fn attribute(&mut self, link: &DocLink, dataset_id: &ObjectId) -> Result<Option<Attribute>> {
        let Some(found) = self.resolve(IndexKind::Attribute, link.id.as_ref(), Some(link.text.as_str()))? else {
            self.diagnose(
                DiagnosticKind::LinkUnresolved,
                format!("attribute {} not in attribute index", link.text),
            );
            let Some(id) = link.id.clone() else {
                return Ok(None);
            };
            let definition = AttributeDefinition {
                name: link.text.clone(),
                id,
                file: None,
                forms: Vec::new(),
            };
            return Ok(Some(Attribute::new(Arc::new(definition), dataset_id.clone(), &link.text)));
        };

        let target = Target::from_link(found, link.id.as_ref());
        let key = (target.id.clone(), target.name.clone());
        if let Some(definition) = self.attribute_memo.get(&key) {
            self.metrics.attribute_memo_hits += 1;
            return Ok(Some(Attribute::new(Arc::clone(definition), dataset_id.clone(), &link.text)));
        }

        let forms = self.attribute_forms(&target)?;
        let definition = Arc::new(AttributeDefinition {
            name: target.name,
            id: target.id,
            file: Some(target.file),
            forms,
        });
        self.attribute_memo.insert(key, Arc::clone(&definition));
        self.metrics.attributes_built += 1;
        Ok(Some(Attribute::new(definition, dataset_id.clone(), &link.text)))
    }

    fn attribute_forms(&mut self, target: &Target) -> Result<Vec<AttributeForm>> {
        let Some(doc) = self.load(&target.file.file)? else {
            return Ok(Vec::new());
        };
        let Some(section) = self.locate(&doc, Some(target.id.as_str()), &target.name, &target.file.file) else {
            return Ok(Vec::new());
        };

        let mut forms = Vec::new();
        for fields in read_attribute_forms(&doc, section, self.corpus.locale()) {
            let mut form = AttributeForm::new(&target.id, fields.name);
            for expression in &fields.expressions {
                for link in &expression.tables {
                    form.tables.push(self.logic_table(link, &expression.column)?);
                }
            }
            forms.push(form);
        }

        let mut seen = HashSet::new();
        forms.retain(|f| seen.insert(f.id.clone()));
        Ok(forms)
    }

    /// Resolve a source-table link, annotated with the column it feeds
    ///
    /// An unresolved table is kept without a defining file.
    fn logic_table(&mut self, link: &DocLink, column: &str) -> Result<LogicTable> {
        let found = self.resolve(IndexKind::LogicTable, link.id.as_ref(), Some(link.text.as_str()))?;
        let table = match found {
            Some(found) => {
                let target = Target::from_link(found, link.id.as_ref());
                LogicTable::new(target.name, target.id).with_file(Some(target.file))
            }
            None => {
                self.diagnose(
                    DiagnosticKind::LinkUnresolved,
                    format!("table {} not in logic table index", link.text),
                );
                let id = link
                    .id
                    .clone()
                    .unwrap_or_else(|| ObjectId::derive([link.href.as_str(), link.text.as_str()]));
                LogicTable::new(&link.text, id)
            }
        };
        Ok(table.with_column(column))
    }

    /// A dataset metric: built from the metric index, or embedded when the
    /// index does not know it
    fn dataset_metric(&mut self, link: &DocLink, dataset_id: &ObjectId) -> Result<Option<Metric>> {
        match self.resolve(IndexKind::Metric, link.id.as_ref(), Some(link.text.as_str()))? {
            Some(found) => {
                let target = Target::from_link(found, link.id.as_ref());
                self.metric(&target, dataset_id, VisitingSet::new())
            }
            None => {
                self.diagnose(
                    DiagnosticKind::LinkUnresolved,
                    format!("metric {} not in metric index, kept as embedded", link.text),
                );
                let id = link
                    .id
                    .clone()
                    .unwrap_or_else(|| ObjectId::derive([link.href.as_str(), link.text.as_str()]));
                let definition = MetricDefinition::embedded(&link.text, id, link.file_ref());
                Ok(Some(Metric::new(Arc::new(definition), dataset_id.clone())))
            }
        }
    }

    /// Build a metric and, for composites, its whole child graph, scoped to
    /// `dataset_id`
    ///
    /// Returns `None` when the metric is already on `visiting` (a cycle) or
    /// its section cannot be found.
    pub fn metric(
        &mut self,
        target: &Target,
        dataset_id: &ObjectId,
        visiting: VisitingSet,
    ) -> Result<Option<Metric>> {
        Ok(self
            .metric_definition(target, visiting)?
            .map(|definition| Metric::new(definition, dataset_id.clone())))
    }

    fn metric_definition(
        &mut self,
        target: &Target,
        visiting: VisitingSet,
    ) -> Result<Option<Arc<MetricDefinition>>> {
        if visiting.contains(&target.id) {
            self.diagnose(
                DiagnosticKind::CircularReference,
                format!(
                    "metric {} ({}) recurs along {}",
                    target.name,
                    target.id,
                    visiting.chain()
                ),
            );
            return Ok(None);
        }

        let key = (target.id.clone(), target.name.clone());
        if let Some(definition) = self.metric_memo.get(&key) {
            self.metrics.metric_memo_hits += 1;
            return Ok(Some(Arc::clone(definition)));
        }

        let Some(doc) = self.load(&target.file.file)? else {
            return Ok(None);
        };
        let Some(section) = self.locate(&doc, Some(target.id.as_str()), &target.name, &target.file.file) else {
            return Ok(None);
        };

        let locale = self.corpus.locale();
        let fields = read_metric(&doc, section, locale);
        for unclassified in fields.unclassified() {
            self.diagnose(
                DiagnosticKind::UnclassifiedReference,
                format!(
                    "{} ({}) in formula of {}, icon {}",
                    unclassified.name,
                    unclassified.id,
                    target.name,
                    unclassified.icon.as_deref().unwrap_or("none")
                ),
            );
        }

        let function = match fields.function() {
            Some(reference) => self.function(reference)?,
            None => None,
        };

        let mut fact = None;
        let mut children = Vec::new();
        match fields.kind {
            MetricKind::Composite => {
                let mut child_refs: Vec<FormulaRef> = fields.children().into_iter().cloned().collect();
                if child_refs.is_empty() {
                    child_refs = embedded_metric_links(&doc, section, locale)
                        .into_iter()
                        .filter_map(|link| {
                            Some(FormulaRef {
                                file: link.file_ref(),
                                id: link.id?,
                                name: link.text,
                                referent: Referent::Metric,
                                icon: None,
                            })
                        })
                        .collect();
                }

                let next = visiting.with(&target.id);
                for child in &child_refs {
                    let Some(found) = self.resolve(IndexKind::Metric, Some(&child.id), Some(child.name.as_str()))? else {
                        self.diagnose(
                            DiagnosticKind::LinkUnresolved,
                            format!("child metric {} of {} not in metric index", child.name, target.name),
                        );
                        continue;
                    };
                    let child_target = Target::from_link(found, Some(&child.id));
                    if let Some(definition) = self.metric_definition(&child_target, next.clone())? {
                        children.push(definition);
                    }
                }
            }
            MetricKind::Simple | MetricKind::Embedded => {
                fact = match fields.fact() {
                    Some(reference) => self.fact(reference)?,
                    None => None,
                };
            }
        }

        let definition = Arc::new(MetricDefinition {
            name: target.name.clone(),
            id: target.id.clone(),
            file: Some(target.file.clone()),
            kind: fields.kind,
            formula: fields.formula.clone(),
            function,
            fact,
            children,
        });
        self.metric_memo.insert(key, Arc::clone(&definition));
        self.metrics.metrics_built += 1;
        Ok(Some(definition))
    }

    fn function(&mut self, reference: &FormulaRef) -> Result<Option<Arc<Function>>> {
        if let Some(function) = self.function_memo.get(&reference.id) {
            return Ok(Some(Arc::clone(function)));
        }
        let Some(found) = self.resolve(IndexKind::Function, Some(&reference.id), Some(reference.name.as_str()))? else {
            self.diagnose(
                DiagnosticKind::LinkUnresolved,
                format!("function {} not in function index", reference.name),
            );
            return Ok(None);
        };

        let target = Target::from_link(found, Some(&reference.id));
        let function = Arc::new(Function {
            name: target.name,
            id: target.id,
            file: Some(target.file),
        });
        self.function_memo.insert(reference.id.clone(), Arc::clone(&function));
        Ok(Some(function))
    }

    fn fact(&mut self, reference: &FormulaRef) -> Result<Option<Arc<Fact>>> {
        if let Some(fact) = self.fact_memo.get(&reference.id) {
            return Ok(Some(Arc::clone(fact)));
        }
        let Some(found) = self.resolve(IndexKind::Fact, Some(&reference.id), Some(reference.name.as_str()))? else {
            self.diagnose(
                DiagnosticKind::LinkUnresolved,
                format!("fact {} not in fact index", reference.name),
            );
            return Ok(None);
        };

        let target = Target::from_link(found, Some(&reference.id));
        let mut tables = Vec::new();
        if let Some(doc) = self.load(&target.file.file)? {
            if let Some(section) = self.locate(&doc, Some(target.id.as_str()), &target.name, &target.file.file) {
                for expression in read_fact(&doc, section, self.corpus.locale()) {
                    for link in &expression.tables {
                        tables.push(self.logic_table(link, &expression.column)?);
                    }
                }
            }
        }

        let fact = Arc::new(Fact {
            name: target.name,
            id: target.id,
            file: Some(target.file),
            tables,
        });
        self.fact_memo.insert(reference.id.clone(), Arc::clone(&fact));
        Ok(Some(fact))
    }
}

impl ReportExtractor for GraphBuilder {
    type Error = crate::ExtractorError;

    fn extract_report(&mut self, report: &ReportRef) -> Result<Report> {
        self.extract(report)
    }
}
