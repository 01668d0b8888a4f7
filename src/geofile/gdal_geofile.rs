use anyhow::{anyhow, Context};
use gdal::vector::{LayerAccess, OGRwkbGeometryType};
use gdal_sys::OGRErr;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::Path;

use super::feature::{Feature, FeatureCollection, FeatureGeometry, FieldDefinition};

pub enum GdalDriverType {
    Shapefile,
    GeoPackage,
}

impl GdalDriverType {
    pub fn name(&self) -> &'static str {
        match self {
            GdalDriverType::Shapefile => "ESRI Shapefile",
            GdalDriverType::GeoPackage => "GPKG",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [GdalDriverType::Shapefile, GdalDriverType::GeoPackage]
            .into_iter()
            .find(|driver| driver.name() == name)
    }

    /// What a file written by this driver is called in user facing messages.
    pub fn file_kind(&self) -> &'static str {
        match self {
            GdalDriverType::Shapefile => "shapefile",
            GdalDriverType::GeoPackage => "GeoPackage",
        }
    }
}

/// Write all features of the collection to a new single-layer geofile, replacing any existing one.
///
/// Fields are created with the collection's types, widths and precisions. The driver may launder
/// field names that break its constraints (e.g. the 10 character limit of shapefiles), so values
/// are written against the field names the driver actually created, by position.
pub fn write_features_to_geofile(
    collection: &FeatureCollection,
    output_filepath: &Path,
    driver: &str,
) -> anyhow::Result<()> {
    gdal::DriverManager::register_all();
    let driver = gdal::DriverManager::get_driver_by_name(driver).context("Getting GDAL driver")?;

    if collection.is_empty() {
        log::warn!("Writing an empty layer to {:?}", output_filepath);
    }
    let layer_type = if collection.geometry_type != OGRwkbGeometryType::wkbUnknown {
        collection.geometry_type
    } else {
        layer_geometry_type(&collection.features)
    };
    match &collection.spatial_ref {
        Some(crs) => log::debug!("Using spatial ref {} for writing geofile", crs.name()?),
        None => log::warn!("Writing {:?} without a spatial ref", output_filepath),
    }

    if output_filepath.exists() {
        // Lets the driver remove every file belonging to the dataset, e.g. shapefile siblings.
        log::debug!("Removing existing {:?}", output_filepath);
        driver
            .delete(output_filepath)
            .with_context(|| format!("Removing existing geofile {:?}", output_filepath))?;
    }
    let mut dataset = driver
        .create_vector_only(output_filepath)
        .with_context(|| format!("Creating geofile {:?}", output_filepath))?;
    let layer_name = output_filepath
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("");
    let layer_options = gdal::LayerOptions {
        name: layer_name,
        srs: collection.spatial_ref.as_ref(),
        ty: layer_type,
        options: None,
    };
    let layer = dataset.create_layer(layer_options)?;

    log::info!("Setting up {} fields", collection.fields.len());
    for field in &collection.fields {
        let field_defn = gdal::vector::FieldDefn::new(&field.name, field.field_type)?;
        field_defn.set_width(field.width);
        field_defn.set_precision(field.precision);
        field_defn
            .add_to_layer(&layer)
            .with_context(|| format!("Creating field {}", field.name))?;
    }
    let written_field_names: Vec<String> = layer.defn().fields().map(|field| field.name()).collect();
    if written_field_names.len() != collection.fields.len() {
        return Err(anyhow!(
            "Driver created {} fields, expected {}",
            written_field_names.len(),
            collection.fields.len()
        ));
    }
    for (field, written_name) in collection.fields.iter().zip(&written_field_names) {
        if &field.name != written_name {
            log::warn!("Field {} was written as {}", field.name, written_name);
        }
    }

    let wkb_geometries: Vec<Option<Vec<u8>>> = collection
        .features
        .par_iter()
        .map(|feature| feature.geometry.as_ref().map(FeatureGeometry::to_wkb).transpose())
        .collect::<anyhow::Result<_>>()?;

    log::info!(
        "Writing {} features to {:?}",
        collection.len(),
        output_filepath
    );
    // Start a transaction in case the driver supports transactions, e.g. GeoPackage.
    // Committing all features once as opposed to per-feature is a massive speedup for these drivers.
    let in_transaction =
        unsafe { gdal_sys::OGR_L_StartTransaction(layer.c_layer()) } == OGRErr::OGRERR_NONE;
    let result = write_features(&layer, collection, &written_field_names, wkb_geometries);
    if in_transaction {
        if result.is_err() {
            unsafe { gdal_sys::OGR_L_RollbackTransaction(layer.c_layer()) };
            return result;
        }
        let err = unsafe { gdal_sys::OGR_L_CommitTransaction(layer.c_layer()) };
        if err != OGRErr::OGRERR_NONE {
            return Err(anyhow!(
                "Committing features to {:?} failed with OGRErr {}",
                output_filepath,
                err
            ));
        }
    }
    result
}

fn write_features<L: LayerAccess>(
    layer: &L,
    collection: &FeatureCollection,
    field_names: &[String],
    wkb_geometries: Vec<Option<Vec<u8>>>,
) -> anyhow::Result<()> {
    let bar = ProgressBar::new(collection.len() as u64);
    for (feature, wkb_geometry) in collection.features.iter().zip(wkb_geometries) {
        let mut gdal_feature = gdal::vector::Feature::new(layer.defn())?;
        if let Some(wkb_geometry) = wkb_geometry {
            gdal_feature.set_geometry(gdal::vector::Geometry::from_wkb(&wkb_geometry)?)?;
        }
        for (field_name, value) in field_names.iter().zip(&feature.values) {
            if let Some(value) = value {
                gdal_feature.set_field(field_name, value)?;
            }
        }
        gdal_feature.create(layer)?;
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(())
}

/// Layer geometry type covering all features. Single and multi variants of the same kind are
/// promoted to the multi variant; anything else mixed, geometries kept as raw WKB, or no
/// geometries at all, is unknown.
fn layer_geometry_type(features: &[Feature]) -> OGRwkbGeometryType::Type {
    use gdal::vector::OGRwkbGeometryType::*;
    let mut layer_type = None;
    for geometry in features.iter().filter_map(|feature| feature.geometry.as_ref()) {
        let geometry_type = match geometry {
            FeatureGeometry::Geo(geo::Geometry::Point(_)) => wkbPoint,
            FeatureGeometry::Geo(geo::Geometry::LineString(_)) => wkbLineString,
            FeatureGeometry::Geo(geo::Geometry::Polygon(_)) => wkbPolygon,
            FeatureGeometry::Geo(geo::Geometry::MultiPoint(_)) => wkbMultiPoint,
            FeatureGeometry::Geo(geo::Geometry::MultiLineString(_)) => wkbMultiLineString,
            FeatureGeometry::Geo(geo::Geometry::MultiPolygon(_)) => wkbMultiPolygon,
            _ => return wkbUnknown,
        };
        layer_type = match layer_type {
            None => Some(geometry_type),
            Some(current) if current == geometry_type => Some(current),
            Some(current) => match (multi_type(current), multi_type(geometry_type)) {
                (Some(a), Some(b)) if a == b => Some(a),
                _ => return wkbUnknown,
            },
        };
    }
    layer_type.unwrap_or(wkbUnknown)
}

fn multi_type(geometry_type: OGRwkbGeometryType::Type) -> Option<OGRwkbGeometryType::Type> {
    use gdal::vector::OGRwkbGeometryType::*;
    match geometry_type {
        wkbPoint | wkbMultiPoint => Some(wkbMultiPoint),
        wkbLineString | wkbMultiLineString => Some(wkbMultiLineString),
        wkbPolygon | wkbMultiPolygon => Some(wkbMultiPolygon),
        _ => None,
    }
}

/// Read the single layer of a geofile into memory, keeping field order and field types.
pub fn read_features_from_geofile(filepath: &Path) -> anyhow::Result<FeatureCollection> {
    if !filepath.exists() {
        return Err(anyhow!("Geofile {:?} not found", filepath));
    }
    gdal::DriverManager::register_all();
    let mut open_options = gdal::DatasetOptions::default();
    open_options.open_flags = gdal::GdalOpenFlags::GDAL_OF_VECTOR;
    let dataset = gdal::Dataset::open_ex(filepath, open_options)
        .with_context(|| format!("Opening geofile {:?}", filepath))?;
    let driver_name = dataset.driver().short_name();

    let layer_count = dataset.layer_count();
    if 0 == layer_count || 1 < layer_count {
        return Err(anyhow!(
            "Found {} layers, only one layer is supported.",
            layer_count
        ));
    }
    let mut layer = dataset.layer(0)?;
    let fields: Vec<FieldDefinition> = layer
        .defn()
        .fields()
        .map(|field| FieldDefinition {
            name: field.name(),
            field_type: field.field_type(),
            width: field.width(),
            precision: field.precision(),
        })
        .collect();
    // Layers without a CRS have no spatial ref.
    let spatial_ref = layer.spatial_ref().ok();
    let geometry_type = unsafe { gdal_sys::OGR_L_GetGeomType(layer.c_layer()) };

    let mut features = Vec::new();
    for gdal_feature in layer.features() {
        let geometry = match gdal_feature.geometry_by_index(0) {
            Ok(geometry) => Some(FeatureGeometry::from_gdal(geometry)?),
            Err(_) => None,
        };
        let values = gdal_feature.fields().map(|(_, value)| value).collect();
        features.push(Feature { geometry, values });
    }
    log::info!(
        "Read {} features with {} fields from {:?} ({})",
        features.len(),
        fields.len(),
        filepath,
        driver_name
    );

    Ok(FeatureCollection {
        fields,
        features,
        spatial_ref,
        geometry_type,
        driver_name,
    })
}
