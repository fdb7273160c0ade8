use std::{borrow::Borrow, cmp::Ordering};

use maud::{html, PreEscaped};

use super::data::Post;

/// Newest first. Used with a stable sort, so equal dates keep input order.
pub(super) fn sort_post<T: Borrow<Post>>(a: &T, b: &T) -> Ordering {
    b.borrow().date.cmp(&a.borrow().date)
}

pub(super) fn render_post_item(post: &Post) -> String {
    html! {
        div.post-item {
            h2 { a href={ (post.slug) ".html" } { (PreEscaped(&post.title)) } }
            p.date { (post.date) }
        }
    }
    .into()
}

/// `my-first_post` -> `My First Post`
pub(super) fn title_from_stem(stem: &str) -> String {
    let mut title = String::with_capacity(stem.len());
    let mut word_start = true;
    for c in stem.chars() {
        let c = if c == '-' || c == '_' { ' ' } else { c };
        if c.is_whitespace() {
            title.push(c);
            word_start = true;
        } else if word_start {
            title.extend(c.to_uppercase());
            word_start = false;
        } else {
            title.extend(c.to_lowercase());
        }
    }
    title
}
