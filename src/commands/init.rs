//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# Site
title: Portfolio
author: John Doe
description: ''

# URL
url: http://example.com
root: /

# Directory
public_dir: public
gallery: content/gallery.yml

# Writing
words_per_minute: 220
extensions: [md, mdx, markdown]
date_format: MMM DD, YYYY

# Content categories
content:
  project:
    dirs: [content/projects]
    permalink: /projects/:slug/
  blog:
    dirs: [content/blog]
    permalink: /blog/:slug/
  article:
    dirs: [content/articles]
    permalink: /articles/:slug/
"#;

const DEFAULT_GALLERY: &str = r#"photos:
  - id: first-light
    src: https://images.example.com/first-light.jpg
    caption: First light over the harbour
    date: 2024-05-01
    tags: [landscape]
    location: { lat: 59.9139, lng: 10.7522 }
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already contains a site", target_dir);
    }

    for dir in ["content/projects", "content/blog", "content/articles"] {
        fs::create_dir_all(target_dir.join(dir))?;
    }

    fs::write(&config_path, DEFAULT_CONFIG)?;
    fs::write(target_dir.join("content/gallery.yml"), DEFAULT_GALLERY)?;

    let today = chrono::Local::now().format("%Y-%m-%d");
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
summary: The first post on this site.
tags: [meta]
pinned: true
---

Welcome! This post lives in `content/blog/hello-world.md`.

## Writing

- Start a file with a `---` block of `key: value` lines
- Write the body in markdown
- Run `folio build` to render it

```sh
folio new blog "My Next Post"
```
"#,
        today
    );
    fs::write(target_dir.join("content/blog/hello-world.md"), sample_post)?;

    tracing::debug!("Initialized site layout in {:?}", target_dir);
    Ok(())
}
