use std::path::Path;

use crate::cleaning::column_names::{rename_columns, RENAME_TABLE};
use crate::geofile::feature::FeatureCollection;
use crate::geofile::gdal_geofile::{read_features_from_geofile, write_features_to_geofile};

/// Read the geofile at `input_filepath`, rename its umlaut columns and write the result to
/// `output_filepath` in the same format. Returns the renamed collection.
pub fn clean_geofile(
    input_filepath: &Path,
    output_filepath: &Path,
) -> anyhow::Result<FeatureCollection> {
    log::info!("Reading {:?}", input_filepath);
    let mut collection = read_features_from_geofile(input_filepath)?;
    rename_columns(&mut collection, &RENAME_TABLE);
    log::debug!("Columns after renaming: {:?}", collection.field_names());
    write_features_to_geofile(&collection, output_filepath, &collection.driver_name)?;
    Ok(collection)
}
