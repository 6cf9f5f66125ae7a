// src/scrape/html.rs

use scraper::ElementRef;

/// Direct element children of `el`, skipping text and comment nodes.
pub fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children().filter_map(ElementRef::wrap)
}

/// Concatenated text of an element and its descendants, trimmed.
pub fn cell_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Trimmed text of every `td`/`th` child of a row.
pub fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    child_elements(row)
        .filter(|c| matches!(c.value().name(), "td" | "th"))
        .map(cell_text)
        .collect()
}

/// Rows that belong to `table` itself: its own `tr` children plus those of its
/// direct `thead`/`tbody`/`tfoot` sections. Rows of nested tables are never
/// reached.
pub fn direct_rows<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut rows = Vec::new();
    for child in child_elements(table) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(child_elements(child).filter(|r| r.value().name() == "tr"))
            }
            _ => {}
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn direct_rows_ignore_nested_tables() {
        let doc = Html::parse_document(
            r#"<table id="outer">
                 <tr><td>a</td><td><table><tr><td>inner</td></tr></table></td></tr>
                 <tr><td>b</td></tr>
               </table>"#,
        );
        let sel = Selector::parse("#outer").unwrap();
        let outer = doc.select(&sel).next().unwrap();

        let rows = direct_rows(outer);
        assert_eq!(rows.len(), 2);
        assert_eq!(row_cells(rows[1]), vec!["b"]);
    }

    #[test]
    fn cell_text_flattens_and_trims() {
        let doc = Html::parse_fragment("<p>  <b>12</b>&nbsp;</p>");
        let sel = Selector::parse("p").unwrap();
        let p = doc.select(&sel).next().unwrap();
        assert_eq!(cell_text(p), "12");
    }
}
