use crate::geofile::feature::FeatureCollection;

/// Column names carrying umlauts, mapped to ASCII names that survive the DBF field name encoding.
pub const RENAME_TABLE: [(&str, &str); 10] = [
    ("SPÖ_votes", "SPO_votes"),
    ("SPÖ_perce", "SPO_perc"),
    ("ÖVP_votes", "OEVP_votes"),
    ("ÖVP_perce", "OEVP_perc"),
    ("FPÖ_votes", "FPOE_votes"),
    ("FPÖ_perce", "FPOE_perc"),
    ("GRÜNE_vot", "GRUENE_votes"),
    ("GRÜNE_per", "GRUENE_perc"),
    ("KPÖ_votes", "KPOE_votes"),
    ("KPÖ_perce", "KPOE_perc"),
];

/// The new name of a column, or the name itself if the table has no entry for it.
/// Matching is exact: no case folding and no prefix matching.
pub fn cleaned_column_name<'a>(name: &'a str, rename_table: &[(&str, &'a str)]) -> &'a str {
    rename_table
        .iter()
        .find(|(old_name, _)| *old_name == name)
        .map_or(name, |(_, new_name)| *new_name)
}

/// Rename the attribute columns of the collection according to the table and return how many
/// columns were renamed.
///
/// Geometries and values are left alone. A renamed column may end up with the same name as another
/// column; such collisions are kept as they are.
pub fn rename_columns(collection: &mut FeatureCollection, rename_table: &[(&str, &str)]) -> usize {
    let mut renamed = 0;
    for field in collection.fields.iter_mut() {
        let new_name = cleaned_column_name(&field.name, rename_table).to_string();
        if new_name != field.name {
            log::debug!("Renaming column {} to {}", field.name, new_name);
            field.name = new_name;
            renamed += 1;
        }
    }
    log::info!(
        "Renamed {} of {} columns",
        renamed,
        collection.fields.len()
    );
    renamed
}
