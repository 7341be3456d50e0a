//! HTML rendering of a [`TocForest`] as nested `<ul>` lists.

use scrolltoc_shared::{TocForest, TocNode};

/// Render the forest as a nested list of links.
///
/// Link content is the heading's own markup and is emitted as-is; ids and
/// hrefs are attribute-escaped. The link whose id equals `active_link` gets
/// `active_class`.
pub fn render_toc_html(forest: &TocForest, active_link: Option<&str>, active_class: &str) -> String {
    let mut html = String::new();
    render_list(&mut html, &forest.entries, active_link, active_class);
    html
}

fn render_list(html: &mut String, nodes: &[TocNode], active_link: Option<&str>, active_class: &str) {
    html.push_str("<ul>\n");
    for node in nodes {
        render_item(html, node, active_link, active_class);
    }
    html.push_str("</ul>\n");
}

fn render_item(html: &mut String, node: &TocNode, active_link: Option<&str>, active_class: &str) {
    html.push_str(&format!(
        "<li><a id=\"{}\" href=\"{}\"",
        html_escape::encode_double_quoted_attribute(&node.link_id),
        html_escape::encode_double_quoted_attribute(&node.href),
    ));
    if active_link == Some(node.link_id.as_str()) {
        html.push_str(&format!(
            " class=\"{}\"",
            html_escape::encode_double_quoted_attribute(active_class)
        ));
    }
    html.push('>');
    html.push_str(&node.content);
    html.push_str("</a>");

    if !node.children.is_empty() {
        html.push('\n');
        render_list(html, &node.children, active_link, active_class);
    }

    html.push_str("</li>\n");
}
