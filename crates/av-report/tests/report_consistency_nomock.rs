//! Cross-artifact consistency: the HTML and PDF reports built from one
//! result set must show the same counts and rows.

use av_common::{parse_results, ResultSet};
use av_report::{ChartRenderer, DocumentRenderer, MarkupRenderer, RenderContext, ReportConfig};
use lopdf::content::Content;
use lopdf::Document;
use regex::Regex;

const INPUT: &str = r#"{"tests":[
    {"name":"login","status":"PASS","duration":"10ms"},
    {"name":"logout","status":"fail","duration":"5ms","error":"timeout"},
    {"name":"signup","status":"SKIP","duration":"0ms"},
    {"name":"reset","status":"Pass","duration":"7ms"},
    {"name":"legacy","duration":"1ms"}
]}"#;

fn html_counts(results: &ResultSet, config: &ReportConfig) -> Vec<String> {
    let summary = results.summarize();
    let ctx = RenderContext::new(results.as_slice(), &summary, config);
    let html = MarkupRenderer::new(config).render(&ctx, "report").unwrap();
    let re = Regex::new(r#"<div class="stat-value">([^<]*)</div>"#).unwrap();
    re.captures_iter(&html).map(|c| c[1].to_string()).collect()
}

fn pdf_texts(results: &ResultSet, config: &ReportConfig) -> Vec<String> {
    let dir = tempfile::tempdir().unwrap();
    let summary = results.summarize();
    let chart = ChartRenderer::new(&config.chart)
        .unwrap()
        .render(&summary, &dir.path().join("chart.png"))
        .unwrap();
    let out = dir.path().join("report.pdf");
    DocumentRenderer::new(config)
        .render(&summary, results.as_slice(), &chart, &out)
        .unwrap();

    let doc = Document::load(&out).unwrap();
    doc.get_pages()
        .values()
        .flat_map(|id| {
            let content = Content::decode(&doc.get_page_content(*id).unwrap()).unwrap();
            content
                .operations
                .into_iter()
                .filter(|op| op.operator == "Tj")
                .map(|op| String::from_utf8_lossy(op.operands[0].as_str().unwrap()).into_owned())
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn test_summary_counts_agree() {
    let results = parse_results(INPUT, "inline").unwrap();
    let config = ReportConfig::default().with_minify(false);

    let html = html_counts(&results, &config);
    assert_eq!(html, ["5", "2", "1", "2"]);

    let pdf = pdf_texts(&results, &config);
    let header_at = pdf.iter().position(|t| t == "Skipped").unwrap();
    assert_eq!(&pdf[header_at + 1..header_at + 5], &html[..]);
}

#[test]
fn test_rows_agree() {
    let results = parse_results(INPUT, "inline").unwrap();
    let config = ReportConfig::default().with_minify(false);

    let pdf = pdf_texts(&results, &config);
    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    let pdf_names: Vec<&str> = pdf
        .iter()
        .map(String::as_str)
        .filter(|t| names.contains(t))
        .collect();
    assert_eq!(pdf_names, names);

    // Four records have no error.
    assert_eq!(pdf.iter().filter(|t| *t == "N/A").count(), 4);
}
