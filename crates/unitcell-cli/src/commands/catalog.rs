use unitcell::PrototypeCatalog;

use crate::cli::CatalogArgs;
use crate::error::Result;

pub fn run(args: CatalogArgs) -> Result<()> {
    let catalog = PrototypeCatalog::get();
    let indices = match args.index {
        Some(index) => {
            catalog.entry(index)?;
            vec![index]
        }
        None => catalog.matching_indices(
            args.pearson.as_deref(),
            args.space_group,
            args.prototype.as_deref(),
        ),
    };
    if indices.is_empty() {
        println!("no catalog entries match the query");
        return Ok(());
    }
    for index in indices {
        let entry = catalog.entry(index)?;
        println!(
            "{index:4}  {:<28} {:<8} group {:<4} {}",
            entry.id, entry.pearson_symbol, entry.space_group, entry.prototype
        );
    }
    Ok(())
}
