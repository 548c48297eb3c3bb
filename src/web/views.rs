//! Server-rendered HTML pages.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write;

use crate::aggregate::ChartData;
use crate::pipeline::SearchReport;

const STYLE: &str = r#"
body { font-family: "Microsoft JhengHei", "PingFang TC", sans-serif; margin: 2rem auto; max-width: 1100px; color: #222; }
form label { display: block; margin-top: .8rem; }
.error { color: #c0392b; font-weight: bold; }
table { border-collapse: collapse; width: 100%; margin-top: 1rem; }
th, td { border: 1px solid #ddd; padding: .4rem; text-align: left; vertical-align: top; }
.charts { display: flex; flex-wrap: wrap; gap: 1.5rem; }
.charts canvas { max-width: 520px; max-height: 360px; }
.positive { color: #27ae60; } .neutral { color: #f39c12; } .negative { color: #c0392b; } .unknown { color: #7f8c8d; }
.cloud span { display: inline-block; margin: .2rem .4rem; }
"#;

const CHART_JS: &str = "https://cdn.jsdelivr.net/npm/chart.js";

/// Only absolute web links become anchors; feed items can carry any scheme.
fn is_web_link(link: &str) -> bool {
    let link = link.trim_start();
    ["http://", "https://"].iter().any(|scheme| {
        link.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// JSON for embedding inside a `<script>` element.
fn script_json(chart: &ChartData) -> String {
    serde_json::to_string(chart)
        .unwrap_or_else(|_| "{\"labels\":[],\"data\":[]}".to_string())
        .replace("</", "<\\/")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"zh-Hant\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        text(title)
    )
}

/// Previously submitted form values, echoed back after a validation error.
#[derive(Debug, Default)]
pub struct FormValues<'a> {
    pub keyword: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub logic: &'a str,
}

/// The search form, optionally with an inline error message.
pub fn index_page(error: Option<&str>, values: &FormValues<'_>) -> String {
    let mut body = String::from("<h1>News Sentiment Search</h1>\n");
    if let Some(error) = error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", text(error));
    }

    let or_selected = values.logic.eq_ignore_ascii_case("OR");
    let _ = write!(
        body,
        r#"<form method="post" action="/scrape">
<label>Keywords (comma or space separated)
<input type="text" name="keyword" value="{keyword}" required></label>
<label>Start date <input type="date" name="start_date" value="{start}" required></label>
<label>End date <input type="date" name="end_date" value="{end}" required></label>
<label>Logic
<select name="logic">
<option value="AND"{and_sel}>AND (title contains every keyword)</option>
<option value="OR"{or_sel}>OR (any keyword)</option>
</select></label>
<p><button type="submit">Search</button></p>
</form>"#,
        keyword = attr(values.keyword),
        start = attr(values.start_date),
        end = attr(values.end_date),
        and_sel = if or_selected { "" } else { " selected" },
        or_sel = if or_selected { " selected" } else { "" },
    );

    layout("News Sentiment Search", &body)
}

fn chart_script(id: &str, kind: &str, chart: &ChartData, colours: Option<&[&str]>) -> String {
    let colours = colours
        .map(|c| serde_json::to_string(c).unwrap_or_else(|_| "[]".to_string()))
        .unwrap_or_else(|| "undefined".to_string());
    format!(
        "<script>(function(){{const d={data};new Chart(document.getElementById('{id}'),\
         {{type:'{kind}',data:{{labels:d.labels,datasets:[{{label:'count',data:d.data,\
         backgroundColor:{colours}}}]}}}});}})();</script>\n",
        data = script_json(chart),
    )
}

fn label_colour(label: &str) -> &'static str {
    match label {
        "positive" => "#2ecc71",
        "neutral" => "#f39c12",
        "negative" => "#e74c3c",
        _ => "#95a5a6",
    }
}

/// The results page for a completed search.
pub fn results_page(report: &SearchReport) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<h1>Results for “{}”</h1>\n<p>{} to {}, logic {}. <a href=\"/\">New search</a></p>",
        text(&report.request.keyword),
        report.request.start_date,
        report.request.end_date,
        report.request.logic,
    );
    let _ = writeln!(body, "<p>Total: <strong>{}</strong> articles</p>", report.count());

    if report.count() == 0 {
        body.push_str("<p>No news matched this search.</p>\n");
        return layout("Search results", &body);
    }

    if let Some(file) = &report.spreadsheet_file {
        let _ = writeln!(
            body,
            "<p><a href=\"/download/{}\">Download spreadsheet ({})</a></p>",
            attr(file),
            text(file)
        );
    }

    body.push_str("<h2>Sentiment</h2>\n<ul>\n");
    for (label, n) in &report.counts.by_sentiment {
        let _ = writeln!(body, "<li class=\"{label}\">{label}: {n}</li>");
    }
    body.push_str("</ul>\n");

    body.push_str("<h2>Sources</h2>\n<p>");
    let sources: Vec<_> = report.sources.iter().map(|s| text(s)).collect();
    body.push_str(&sources.join(", "));
    body.push_str("</p>\n");

    body.push_str(
        "<div class=\"charts\">\n<canvas id=\"sourceChart\"></canvas>\n\
         <canvas id=\"trendChart\"></canvas>\n<canvas id=\"sentimentChart\"></canvas>\n</div>\n",
    );

    if !report.terms.is_empty() {
        body.push_str("<h2>Word cloud</h2>\n");
        if let Some(file) = &report.word_cloud_file {
            let _ = writeln!(
                body,
                "<p><img src=\"/static/{}\" alt=\"word cloud\" width=\"600\"></p>",
                attr(file)
            );
        }
        body.push_str("<p class=\"cloud\">");
        for term in report.terms.iter().take(60) {
            let size = 0.8 + 1.6 * term.weight;
            let _ = write!(
                body,
                "<span style=\"font-size:{size:.2}em\" title=\"{}\">{}</span>",
                term.count,
                text(&term.term)
            );
        }
        body.push_str("</p>\n");
    }

    body.push_str(
        "<table>\n<tr><th>Title</th><th>Published</th><th>Source</th><th>Keyword</th>\
         <th>Score</th><th>Sentiment</th></tr>\n",
    );
    for scored in &report.items {
        let item = &scored.item;
        let score = scored
            .sentiment_score
            .map(|s| format!("{s:.4}"))
            .unwrap_or_else(|| "N/A".to_string());
        let title = if is_web_link(&item.link) {
            format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
                attr(&item.link),
                text(&item.title)
            )
        } else {
            text(&item.title).into_owned()
        };
        let _ = writeln!(
            body,
            "<tr><td>{title}</td><td>{published}</td><td>{source}</td><td>{keyword}</td>\
             <td>{score}</td><td class=\"{label}\">{label}</td></tr>",
            published = item.published_at.format("%Y-%m-%d %H:%M:%S"),
            source = text(&item.source),
            keyword = text(&item.keyword),
            label = scored.sentiment_label,
        );
    }
    body.push_str("</table>\n");

    let sentiment_chart = report.counts.sentiment_chart();
    let sentiment_colours: Vec<&str> = sentiment_chart.labels.iter().map(|l| label_colour(l)).collect();

    let _ = writeln!(body, "<script src=\"{CHART_JS}\"></script>");
    body.push_str(&chart_script("sourceChart", "pie", &report.counts.source_chart(), None));
    body.push_str(&chart_script("trendChart", "line", &report.counts.trend_chart(), None));
    body.push_str(&chart_script(
        "sentimentChart",
        "bar",
        &sentiment_chart,
        Some(sentiment_colours.as_slice()),
    ));

    layout("Search results", &body)
}
