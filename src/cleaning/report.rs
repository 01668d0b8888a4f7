use std::path::Path;

use crate::geofile::gdal_geofile::GdalDriverType;

/// Lines confirming the written file and listing its columns, numbered from 1.
pub fn report_lines(output_filepath: &Path, driver_name: &str, columns: &[String]) -> Vec<String> {
    let file_kind =
        GdalDriverType::from_name(driver_name).map_or("geofile", |driver| driver.file_kind());
    let mut lines = vec![
        format!("Cleaned {} saved to: {}", file_kind, output_filepath.display()),
        "New columns:".to_string(),
    ];
    lines.extend(
        columns
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{}. {}", index + 1, column)),
    );
    lines
}

pub fn print_report(output_filepath: &Path, driver_name: &str, columns: &[String]) {
    for line in report_lines(output_filepath, driver_name, columns) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use std::path::Path;

    use super::report_lines;

    #[rstest]
    fn test_report_lines() {
        let columns = vec![
            "SPO_votes".to_string(),
            "Other".to_string(),
            "geometry".to_string(),
        ];
        let lines = report_lines(
            Path::new("Shapefiles/cleaned.shp"),
            "ESRI Shapefile",
            &columns,
        );
        assert_eq!(
            lines,
            vec![
                "Cleaned shapefile saved to: Shapefiles/cleaned.shp",
                "New columns:",
                "1. SPO_votes",
                "2. Other",
                "3. geometry",
            ]
        );
    }

    #[rstest]
    #[case("GPKG", "Cleaned GeoPackage saved to: out.gpkg")]
    #[case("FlatGeobuf", "Cleaned geofile saved to: out.gpkg")]
    fn test_report_names_the_written_format(#[case] driver_name: &str, #[case] first_line: &str) {
        let lines = report_lines(Path::new("out.gpkg"), driver_name, &[]);
        assert_eq!(lines, vec![first_line, "New columns:"]);
    }
}
