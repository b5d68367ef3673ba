use std::str::FromStr;

use eyre::Result;
use tabled::builder::Builder;
use tabled::settings::Style;

use fviz_render::Layer;

/// List all layers and their description.
///
pub fn list_layers() -> Result<String> {
    let header = vec!["Name", "Description"];

    let mut builder = Builder::default();
    builder.push_record(header);

    for name in Layer::names() {
        let layer = Layer::from_str(name)?;
        builder.push_record(vec![*name, layer.description()]);
    }

    let table = builder.build().with(Style::rounded()).to_string();
    let table = format!("Listing all layers:\n{table}");
    Ok(table)
}
