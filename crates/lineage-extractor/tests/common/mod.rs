//! A small pt-BR documentation corpus written to a temp directory
//!
//! Two reports share one cube. The first also uses an ad-hoc report, a
//! shortcut and a dataset no index knows. The cube shows a simple metric, a
//! composite over two simple metrics, a pair of metrics referencing each
//! other and a metric missing from the metric index.

#![allow(dead_code)]

use lineage_extractor::{Corpus, ExtractorConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const REPORT_SALES: &str = "A1000000000000000000000000000001";
pub const REPORT_FINANCE: &str = "A1000000000000000000000000000002";

pub const CUBE: &str = "C1000000000000000000000000000001";
pub const AD_HOC: &str = "D1000000000000000000000000000001";
pub const SHORTCUT: &str = "E1000000000000000000000000000001";
pub const GHOST: &str = "9F000000000000000000000000000009";

pub const ATTR_MONTH: &str = "B1000000000000000000000000000001";
pub const ATTR_YEAR: &str = "B1000000000000000000000000000002";

pub const METRIC_REVENUE: &str = "F1000000000000000000000000000001";
pub const METRIC_COST: &str = "F1000000000000000000000000000002";
pub const METRIC_MARGIN: &str = "F1000000000000000000000000000003";
pub const METRIC_LOOP_A: &str = "F1000000000000000000000000000004";
pub const METRIC_LOOP_B: &str = "F1000000000000000000000000000005";
pub const METRIC_UNINDEXED: &str = "F1000000000000000000000000000009";

pub const FACT_REVENUE: &str = "FA000000000000000000000000000001";
pub const FACT_COST: &str = "FA000000000000000000000000000002";
pub const FUNCTION_SUM: &str = "FB000000000000000000000000000001";

pub const TABLE_SALES: &str = "DD000000000000000000000000000001";
pub const TABLE_MONTH: &str = "DD000000000000000000000000000002";
pub const TABLE_YEAR: &str = "DD000000000000000000000000000003";

/// A corpus on disk; removed when dropped
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    /// Write the standard corpus
    pub fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fixture.write_indexes();
        fixture.write_pages();
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn corpus(&self) -> Corpus {
        self.corpus_with(ExtractorConfig::default())
    }

    pub fn corpus_with(&self, config: ExtractorConfig) -> Corpus {
        Corpus::open(self.root(), config).unwrap()
    }

    /// Write `html` as windows-1252, the exporter's encoding
    pub fn write(&self, file: &str, html: &str) {
        let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(html);
        assert!(!had_errors, "fixture text must be representable in windows-1252");
        fs::write(self.root().join(file), bytes).unwrap();
    }

    pub fn remove(&self, file: &str) {
        fs::remove_file(self.root().join(file)).unwrap();
    }

    fn write_indexes(&self) {
        self.write(
            "Documento.html",
            &index(&[
                ("Painel de Vendas", "Documentos.html", REPORT_SALES),
                ("Painel Financeiro", "Documentos.html", REPORT_FINANCE),
            ]),
        );
        self.write(
            "CuboInteligente.html",
            &index(&[("Cubo Vendas", "Cubos.html", CUBE)]),
        );
        self.write(
            "Relatório.html",
            &index(&[("Vendas por Mês", "Relatorios.html", AD_HOC)]),
        );
        self.write(
            "Atalho.html",
            &index(&[("Atalho Vendas", "Atalhos.html", SHORTCUT)]),
        );
        self.write(
            "Métrica.html",
            &index(&[
                ("Receita", "Metricas.html", METRIC_REVENUE),
                ("Custo", "Metricas.html", METRIC_COST),
                ("Margem", "Metricas.html", METRIC_MARGIN),
                ("Ciclo A", "Metricas.html", METRIC_LOOP_A),
                ("Ciclo B", "Metricas.html", METRIC_LOOP_B),
            ]),
        );
        self.write(
            "Fato.html",
            &index(&[
                ("Receita", "Fatos.html", FACT_REVENUE),
                ("Custo", "Fatos.html", FACT_COST),
            ]),
        );
        self.write(
            "Função.html",
            &index(&[("Sum", "Funcoes.html", FUNCTION_SUM)]),
        );
        self.write(
            "Atributo.html",
            &index(&[
                ("Mês", "Atributos.html", ATTR_MONTH),
                ("Ano", "Atributos.html", ATTR_YEAR),
            ]),
        );
        self.write(
            "TabelaLógica.html",
            &index(&[
                ("FT_VENDAS", "Tabelas.html", TABLE_SALES),
                ("LU_MES", "Tabelas.html", TABLE_MONTH),
            ]),
        );
    }

    fn write_pages(&self) {
        self.write(
            "Documentos.html",
            &page(&[
                object(
                    REPORT_SALES,
                    &format!(
                        r#"<table><tr><td>DOCUMENT DEFINITION</td></tr></table>
                           <table>
                             <tr><td>{}</td></tr>
                             <tr><td>{}</td></tr>
                             <tr><td>{}</td></tr>
                             <tr><td>{}</td></tr>
                           </table>"#,
                        link("Cubos.html", CUBE, "Cubo Vendas"),
                        link("Relatorios.html", AD_HOC, "Vendas por Mês"),
                        link("Atalhos.html", SHORTCUT, "Atalho Vendas"),
                        link("Sumidos.html", GHOST, "Fantasma"),
                    ),
                ),
                object(
                    REPORT_FINANCE,
                    r#"<table><tr><td>DOCUMENT DEFINITION</td></tr></table>
                       <table><tr><td>Datasets:</td><td>Cubo Vendas</td></tr></table>"#,
                ),
            ]),
        );

        self.write(
            "Cubos.html",
            &page(&[object(
                CUBE,
                &format!(
                    r#"<table><tr><td>OBJETOS DE TEMPLATE</td></tr></table>
                       <table>
                         <tr><td>OBJETOS DO RELATÓRIO</td><td>LINHAS</td><td>COLUNAS</td></tr>
                         <tr><td>Todos</td><td>{}{}</td><td>{}{}{}{}</td></tr>
                       </table>"#,
                    link("Atributos.html", ATTR_MONTH, "Mês"),
                    link("Atributos.html", ATTR_YEAR, "Ano"),
                    link("Metricas.html", METRIC_REVENUE, "Receita"),
                    link("Metricas.html", METRIC_MARGIN, "Margem"),
                    link("Metricas.html", METRIC_LOOP_A, "Ciclo A"),
                    link("Metricas.html", METRIC_UNINDEXED, "Indicador Zeta"),
                ),
            )]),
        );

        self.write(
            "Relatorios.html",
            &page(&[object(
                AD_HOC,
                &format!(
                    r#"<img src="ViewReport.bmp">
                       <table>
                         <tr><!-- [ROWS] --><td>{}</td></tr>
                         <tr><!-- [COLUMNS] --><td>{}{}</td></tr>
                       </table>
                       <table><tr><td>OPÇÕES DO GRÁFICO</td></tr></table>
                       <table><tr><td>Tipo de gráfico</td><td>Barra vertical</td></tr></table>"#,
                    link("Atributos.html", ATTR_MONTH, "Mês"),
                    link("Metricas.html", METRIC_REVENUE, "Receita"),
                    link("Metricas.html", METRIC_MARGIN, "Margem"),
                ),
            )]),
        );

        self.write(
            "Atributos.html",
            &page(&[
                object(
                    ATTR_MONTH,
                    &format!(
                        "{}{}{}",
                        section_header("DETALHES DOS FORMULÁRIOS DE ATRIBUTO"),
                        form(
                            &format!("{}_1", ATTR_MONTH),
                            "ID",
                            "CD_MES",
                            &link("Tabelas.html", TABLE_MONTH, "LU_MES"),
                        ),
                        form(
                            &format!("{}_2", ATTR_MONTH),
                            "DESC",
                            "DS_MES",
                            &link("Tabelas.html", TABLE_MONTH, "LU_MES"),
                        ),
                    ),
                ),
                object(
                    ATTR_YEAR,
                    &format!(
                        "{}{}",
                        section_header("DETALHES DOS FORMULÁRIOS DE ATRIBUTO"),
                        form(
                            &format!("{}_1", ATTR_YEAR),
                            "ID",
                            "CD_ANO",
                            &link("Tabelas.html", TABLE_YEAR, "LU_ANO"),
                        ),
                    ),
                ),
            ]),
        );

        self.write(
            "Metricas.html",
            &page(&[
                simple_metric(METRIC_REVENUE, FACT_REVENUE, "Receita"),
                simple_metric(METRIC_COST, FACT_COST, "Custo"),
                composite_metric(
                    METRIC_MARGIN,
                    &format!(
                        "{} - {}",
                        metric_ref(METRIC_REVENUE, "Receita"),
                        metric_ref(METRIC_COST, "Custo")
                    ),
                ),
                composite_metric(METRIC_LOOP_A, &metric_ref(METRIC_LOOP_B, "Ciclo B")),
                composite_metric(METRIC_LOOP_B, &metric_ref(METRIC_LOOP_A, "Ciclo A")),
            ]),
        );

        self.write(
            "Fatos.html",
            &page(&[
                fact(FACT_REVENUE, "VL_RECEITA"),
                fact(FACT_COST, "VL_CUSTO"),
            ]),
        );
    }
}

pub fn index(entries: &[(&str, &str, &str)]) -> String {
    let body: String = entries
        .iter()
        .map(|(name, file, id)| {
            format!(
                r#"<tr><td><a class="MAINBODY" href="{}#{}">{}</a></td></tr>"#,
                file, id, name
            )
        })
        .collect();
    format!("<html><body><table>{}</table></body></html>", body)
}

pub fn page(objects: &[String]) -> String {
    format!("<html><body>{}</body></html>", objects.concat())
}

/// One object: everything it documents sits in the anchor's row
pub fn object(id: &str, body: &str) -> String {
    format!(
        r#"<table><tr><td><a name="{}"></a>{}</td></tr></table>"#,
        id, body
    )
}

pub fn link(file: &str, id: &str, text: &str) -> String {
    format!(r#"<a href="{}#[$$$${}$$$$]">{}</a>"#, file, id, text)
}

pub fn section_header(title: &str) -> String {
    format!(
        r#"<table class="SECTIONHEADER"><tr><td>{}</td></tr></table>"#,
        title
    )
}

pub fn form(anchor: &str, name: &str, column: &str, tables: &str) -> String {
    format!(
        r#"<a name="{anchor}"></a>
           <table><tr><td><b>{name}</b></td></tr></table>
           <table>
             <tr><td>Categoria</td><td>{name}</td></tr>
             <tr><td>Expressões</td><td>
               <table>
                 <tr><td>EXPRESSÃO</td><td>MÉTODO</td><td>TABELAS FONTE</td></tr>
                 <tr><td>{column}</td><td>Automático</td><td>{tables}</td></tr>
               </table>
             </td></tr>
           </table>"#
    )
}

fn metric(id: &str, kind: &str, formula: &str) -> String {
    object(
        id,
        &format!(
            r#"{}
               <table>
                 <tr><td>Tipo de métrica</td><td>{}</td></tr>
                 <tr><td>FÓRMULA</td><td>{}</td></tr>
               </table>"#,
            section_header("DEFINIÇÃO"),
            kind,
            formula
        ),
    )
}

pub fn simple_metric(id: &str, fact_id: &str, fact_name: &str) -> String {
    metric(
        id,
        "Simples",
        &format!(
            r#"<img src="Function.bmp">{}(<img src="Fact.bmp">{})"#,
            link("Funcoes.html", FUNCTION_SUM, "Sum"),
            link("Fatos.html", fact_id, fact_name)
        ),
    )
}

pub fn composite_metric(id: &str, formula: &str) -> String {
    metric(id, "Composto", formula)
}

pub fn metric_ref(id: &str, name: &str) -> String {
    format!(
        r#"<img src="Metric.bmp">{}"#,
        link("Metricas.html", id, name)
    )
}

pub fn fact(id: &str, column: &str) -> String {
    object(
        id,
        &format!(
            r#"{}
               <table>
                 <tr><td>EXPRESSÃO</td><td>MAPEAMENTO</td><td>TABELAS FONTE</td></tr>
                 <tr><td>{}</td><td>Automático</td><td>{}</td></tr>
               </table>"#,
            section_header("EXPRESSÕES"),
            column,
            link("Tabelas.html", TABLE_SALES, "FT_VENDAS")
        ),
    )
}
