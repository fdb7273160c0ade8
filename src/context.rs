use std::path::PathBuf;

pub(crate) const DEFAULT_SITE_TITLE: &str = "Vibe Reversing - Reverse Engineering Notes";

#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub notes_dir: PathBuf,
    pub out_dir: PathBuf,
    pub template_dir: PathBuf,
    pub css_dir: PathBuf,

    /// Subdirectory of `out_dir` receiving the stylesheets.
    pub css_target: PathBuf,
    pub css_suffix: String,

    pub site_title: String,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            notes_dir: PathBuf::from("notes"),
            out_dir: PathBuf::from("docs"),
            template_dir: PathBuf::from("templates"),
            css_dir: PathBuf::from("css"),
            css_target: PathBuf::from("css"),
            css_suffix: ".css".to_string(),
            site_title: DEFAULT_SITE_TITLE.to_string(),
        }
    }
}

impl Context {
    /// The default layout, anchored under `root` instead of the working directory.
    #[cfg(test)]
    pub fn with_root(root: &std::path::Path) -> Self {
        let d = Self::default();
        Self {
            notes_dir: root.join(d.notes_dir),
            out_dir: root.join(d.out_dir),
            template_dir: root.join(d.template_dir),
            css_dir: root.join(d.css_dir),
            ..d
        }
    }

    pub fn css_out_dir(&self) -> PathBuf {
        self.out_dir.join(&self.css_target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let c = Context::default();
        assert_eq!(c.notes_dir, PathBuf::from("notes"));
        assert_eq!(c.out_dir, PathBuf::from("docs"));
        assert_eq!(c.css_out_dir(), PathBuf::from("docs/css"));
        assert_eq!(c.site_title, DEFAULT_SITE_TITLE);
    }

    #[test]
    fn rooted_layout() {
        let c = Context::with_root(std::path::Path::new("/tmp/site"));
        assert_eq!(c.template_dir, PathBuf::from("/tmp/site/templates"));
        assert_eq!(c.css_out_dir(), PathBuf::from("/tmp/site/docs/css"));
        assert_eq!(c.css_suffix, ".css");
    }
}
