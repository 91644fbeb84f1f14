//! Builder tests against an en-US corpus exercising the fallback paths

#[cfg(test)]
mod tests {
    use crate::{Corpus, DiagnosticKind, ExtractorConfig, GraphBuilder, Target, VisitingSet};
    use lineage_domain::{FileRef, MetricKind, ObjectId, ReportRef};
    use std::fs;
    use tempfile::TempDir;

    const REPORT: &str = "AB000000000000000000000000000001";
    const CUBE: &str = "CB000000000000000000000000000001";
    const PROFIT: &str = "EB000000000000000000000000000001";
    const REVENUE: &str = "EB000000000000000000000000000002";
    const TAX: &str = "EB000000000000000000000000000003";

    fn id(s: &str) -> ObjectId {
        ObjectId::parse(s).unwrap()
    }

    fn write(dir: &TempDir, file: &str, html: &str) {
        let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(html);
        fs::write(dir.path().join(file), bytes).unwrap();
    }

    fn index(entries: &[(&str, &str, &str)]) -> String {
        let rows: String = entries
            .iter()
            .map(|(name, file, id)| {
                format!(r#"<p><a class="MAINBODY" href="{file}#{id}">{name}</a></p>"#)
            })
            .collect();
        format!("<html><body>{rows}</body></html>")
    }

    fn corpus() -> (TempDir, Corpus) {
        let dir = TempDir::new().unwrap();

        write(&dir, "Document.html", &index(&[("Sales Board", "Docs.html", REPORT)]));
        write(&dir, "IntelligentCube.html", &index(&[("Sales Cube", "Cubes.html", CUBE)]));
        write(
            &dir,
            "Metric.html",
            &index(&[
                ("Profit", "Metrics.html", PROFIT),
                ("Revenue", "Metrics.html", REVENUE),
                ("Tax", "Metrics.html", TAX),
            ]),
        );
        for empty in [
            "Report.html",
            "Shortcut.html",
            "Fact.html",
            "Function.html",
            "Attribute.html",
            "LogicalTable.html",
        ] {
            write(&dir, empty, &index(&[]));
        }

        write(
            &dir,
            "Docs.html",
            &format!(
                r#"<table><tr><td><a name="{REPORT}"></a>
                     <table><tr><td>DOCUMENT DEFINITION</td></tr></table>
                     <table><tr><td><a href="Cubes.html#[$$$${CUBE}$$$$]">Sales Cube</a></td></tr></table>
                   </td></tr></table>"#
            ),
        );
        write(
            &dir,
            "Cubes.html",
            &format!(
                r#"<table><tr><td><a name="{CUBE}"></a>
                     <table><tr><td>TEMPLATE OBJECTS</td></tr></table>
                     <table>
                       <tr><td>REPORT OBJECTS</td><td>ROWS</td><td>COLUMNS</td></tr>
                       <tr><td>All</td><td></td><td>
                         <a href="Metrics.html#[$$$${PROFIT}$$$$]">Profit</a>
                         <a href="Metrics.html#[$$$${TAX}$$$$]">Tax</a>
                       </td></tr>
                     </table>
                   </td></tr></table>"#
            ),
        );
        write(
            &dir,
            "Metrics.html",
            &format!(
                r#"<table><tr><td><a name="{PROFIT}"></a>
                     <table class="SECTIONHEADER"><tr><td>DEFINITION</td></tr></table>
                     <table>
                       <tr><td>Metric Type</td><td>Composite</td></tr>
                       <tr><td>FORMULA</td><td>Complex <img src="Prompt.bmp"><a href="Prompts.html#[$$$$0C$$$$]">Year?</a></td></tr>
                     </table>
                     <table>
                       <tr><td><!-- EMBEDDED METRIC --></td></tr>
                       <tr><td><img src="Metric.bmp"><a href="Metrics.html#[$$$${REVENUE}$$$$]">Revenue</a></td></tr>
                     </table>
                   </td></tr></table>
                   <table><tr><td>
                     <table><tr><td><!-- [OBJECT: Revenue] -->Revenue</td></tr></table>
                     <table class="SECTIONHEADER"><tr><td>DEFINITION</td></tr></table>
                     <table>
                       <tr><td>Metric Type</td><td>Simple</td></tr>
                       <tr><td>FORMULA</td><td><img src="Function.bmp"><a href="Fn.html#[$$$$0D$$$$]">Sum</a>(<img src="Fact.bmp"><a href="Facts.html#[$$$$0E$$$$]">Amount</a>)</td></tr>
                     </table>
                   </td></tr></table>"#
            ),
        );

        let config = ExtractorConfig {
            locale: "en-US".to_string(),
            ..ExtractorConfig::sequential()
        };
        let corpus = Corpus::open(dir.path(), config).unwrap();
        (dir, corpus)
    }

    fn extract() -> (lineage_domain::Report, GraphBuilder) {
        let (_dir, corpus) = corpus();
        let reference = corpus.find_by_id(&id(REPORT)).unwrap().unwrap();
        let mut builder = GraphBuilder::new(corpus);
        let report = builder.extract(&reference).unwrap();
        (report, builder)
    }

    #[test]
    fn test_english_corpus() {
        let (report, _) = extract();
        assert_eq!(report.name, "Sales Board");
        assert_eq!(report.datasets.len(), 1);
        assert_eq!(report.datasets[0].id, id(CUBE));
    }

    #[test]
    fn test_embedded_block_supplies_children() {
        let (report, builder) = extract();
        let metrics = &report.datasets[0].metrics;

        // Tax has no section and is left out
        assert_eq!(metrics.len(), 1);
        let profit = &metrics[0];
        assert_eq!(profit.kind(), MetricKind::Composite);
        assert_eq!(profit.children().len(), 1);
        assert_eq!(profit.children()[0].id, id(REVENUE));

        let diagnostics = builder.metrics();
        assert_eq!(
            diagnostics.diagnostic_count(DiagnosticKind::UnclassifiedReference),
            1
        );
        assert_eq!(
            diagnostics.diagnostic_count(DiagnosticKind::SectionNotFound),
            1
        );
    }

    #[test]
    fn test_legacy_comment_section() {
        let (report, builder) = extract();
        let revenue = &report.datasets[0].metrics[0].children()[0];

        assert_eq!(revenue.kind, MetricKind::Simple);
        assert_eq!(revenue.formula.as_deref(), Some("Sum (Amount)"));
        // Function and fact indexes are empty
        assert!(revenue.function.is_none());
        assert!(revenue.fact.is_none());
        assert_eq!(
            builder
                .metrics()
                .diagnostic_count(DiagnosticKind::LinkUnresolved),
            2
        );
    }

    #[test]
    fn test_metric_on_visiting_path_is_cut() {
        let (_dir, corpus) = corpus();
        let mut builder = GraphBuilder::new(corpus);
        let target = Target {
            id: id(PROFIT),
            name: "Profit".to_string(),
            file: FileRef::new("Metrics.html", Some(PROFIT.to_string())),
        };

        let visiting = VisitingSet::new().with(&id(PROFIT));
        let cut = builder.metric(&target, &id(CUBE), visiting).unwrap();
        assert!(cut.is_none());
        assert_eq!(builder.memoized_metrics(), 0);
        assert_eq!(
            builder.diagnostics()[0].kind,
            DiagnosticKind::CircularReference
        );

        let built = builder
            .metric(&target, &id(CUBE), VisitingSet::new())
            .unwrap()
            .unwrap();
        assert_eq!(built.dataset_id, id(CUBE));
        assert_eq!(builder.memoized_metrics(), 2);
    }

    #[test]
    fn test_report_without_id_gets_a_stable_one() {
        let (_dir, corpus) = corpus();
        let reference = ReportRef {
            name: "Sales Board".to_string(),
            id: None,
            file: FileRef::new("Docs.html", Some(REPORT.to_string())),
        };

        let first = GraphBuilder::new(corpus.clone()).extract(&reference).unwrap();
        let second = GraphBuilder::new(corpus).extract(&reference).unwrap();
        assert!(first.id.is_canonical());
        assert_eq!(first.id, ObjectId::derive([reference.file.href().as_str(), "Sales Board"]));
        assert_eq!(first, second);
        assert_eq!(first.datasets.len(), 1);
    }
}
