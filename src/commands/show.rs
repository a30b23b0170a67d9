//! Show a single entry

use anyhow::Result;

use crate::Folio;

/// Print one entry's rendered HTML, or its full record as JSON
pub fn run(folio: &Folio, category: &str, slug: &str, json: bool) -> Result<()> {
    let entry = folio.feed(category)?.entry(slug)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!("{}", entry.html);
    }
    Ok(())
}
