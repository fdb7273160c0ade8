use std::path::PathBuf;

use log::{debug, info};

use crate::{
    context::Context,
    error::{self, Result},
    renderer::{render, Templates},
};

mod assets;
mod data;
mod markdown;
mod utils;

use data::Post;
pub(crate) use data::Summary;

const NOTE_SUFFIX: &str = ".md";

fn generate_post(post: &Post, templates: &Templates, ctx: &Context) -> Result<PathBuf> {
    let date = post.date.to_string();
    let page = render(
        &templates.post,
        &[
            ("TITLE", post.title.as_str()),
            ("DATE", date.as_str()),
            ("CONTENT", post.content.as_str()),
        ],
    );

    let out_path = ctx.out_dir.join(post.file_name());
    error::write(&out_path, page)?;
    Ok(out_path)
}

/// Post items, newest first.
fn build_post_list(posts: &[Post]) -> String {
    let mut posts: Vec<&Post> = posts.iter().collect();
    posts.sort_by(utils::sort_post);
    posts.into_iter().map(utils::render_post_item).collect()
}

fn generate_index(posts: &[Post], templates: &Templates, ctx: &Context) -> Result<PathBuf> {
    let post_list = build_post_list(posts);
    let page = render(
        &templates.index,
        &[
            ("POST_LIST", post_list.as_str()),
            ("TITLE", ctx.site_title.as_str()),
        ],
    );

    let out_path = ctx.out_dir.join("index.html");
    error::write(&out_path, page)?;
    Ok(out_path)
}

fn collect_notes(ctx: &Context) -> Result<Vec<PathBuf>> {
    if !ctx.notes_dir.is_dir() {
        info!("Notes directory({:?}) does not exist. ignoring...", ctx.notes_dir);
        return Ok(vec![]);
    }
    assets::list_files(&ctx.notes_dir, NOTE_SUFFIX)
}

/// Runs the whole pipeline: every note page, then the index, then stylesheets.
///
/// Stops at the first failure. Pages written before it stay on disk.
pub(crate) fn generate(ctx: &Context) -> Result<Summary> {
    error::create_dir_all(&ctx.out_dir)?;
    let templates = Templates::load(&ctx.template_dir)?;

    let mut posts = vec![];
    for path in collect_notes(ctx)? {
        let result = markdown::parse_markdown_file(&path)
            .and_then(|post| generate_post(&post, &templates, ctx).map(|out| (post, out)));
        match result {
            Ok((post, out_path)) => {
                println!("Generated: {}", out_path.display());
                posts.push(post);
            }
            Err(e) => {
                log::error!("Aborting at {path:?}: {e}");
                return Err(e);
            }
        }
    }

    let index_path = generate_index(&posts, &templates, ctx)?;
    println!("Generated: {}", index_path.display());

    let copied = assets::copy_assets(&ctx.css_dir, &ctx.css_out_dir(), &ctx.css_suffix)?;
    debug!("Copied {} asset(s)", copied.len());

    Ok(Summary {
        posts: posts.len(),
        out_dir: ctx.out_dir.clone(),
    })
}
