use gdal::vector::{FieldValue, OGRFieldType, OGRwkbGeometryType};

/// Name under which the geometry shows up in the column listing of a collection.
pub const GEOMETRY_COLUMN: &str = "geometry";

/// One attribute column of a vector layer.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: OGRFieldType::Type,
    pub width: i32,
    pub precision: i32,
}

/// Geometry of a feature. Flat 2D geometries are held as `geo` types; anything `geo` cannot
/// represent (Z/M coordinates, curves, collections) is carried as the source WKB, untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    Geo(geo::Geometry),
    Wkb(Vec<u8>),
}

impl FeatureGeometry {
    pub fn from_gdal(geometry: &gdal::vector::Geometry) -> anyhow::Result<Self> {
        use gdal::vector::OGRwkbGeometryType::*;
        match geometry.geometry_type() {
            wkbPoint | wkbLineString | wkbPolygon | wkbMultiPoint | wkbMultiLineString
            | wkbMultiPolygon => Ok(Self::Geo(geometry.to_geo()?)),
            _ => Ok(Self::Wkb(geometry.wkb()?)),
        }
    }

    pub fn to_wkb(&self) -> anyhow::Result<Vec<u8>> {
        match self {
            Self::Geo(geometry) => wkb::geom_to_wkb(geometry)
                .map_err(|err| anyhow::anyhow!("Could not write geometry to WKB, {:?}", err)),
            Self::Wkb(wkb) => Ok(wkb.clone()),
        }
    }
}

impl From<geo::Geometry> for FeatureGeometry {
    fn from(value: geo::Geometry) -> Self {
        Self::Geo(value)
    }
}

#[derive(Debug)]
pub struct Feature {
    pub geometry: Option<FeatureGeometry>,
    /// Attribute values aligned with the fields of the owning collection. `None` is a NULL field.
    pub values: Vec<Option<FieldValue>>,
}

/// An in-memory vector dataset: a single layer of features sharing one set of fields.
pub struct FeatureCollection {
    pub fields: Vec<FieldDefinition>,
    pub features: Vec<Feature>,
    pub spatial_ref: Option<gdal::spatial_ref::SpatialRef>,
    /// Declared geometry type of the source layer; `wkbUnknown` lets the writer derive it.
    pub geometry_type: OGRwkbGeometryType::Type,
    /// Short name of the GDAL driver the collection was read with, e.g. "ESRI Shapefile".
    pub driver_name: String,
}

impl FeatureCollection {
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }

    /// Attribute names in field order, followed by the geometry column.
    pub fn columns(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| field.name.clone())
            .chain(std::iter::once(GEOMETRY_COLUMN.to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
impl FieldDefinition {
    pub fn string(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: OGRFieldType::OFTString,
            width: 0,
            precision: 0,
        }
    }

    pub fn integer(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: OGRFieldType::OFTInteger,
            width: 0,
            precision: 0,
        }
    }

    pub fn real(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: OGRFieldType::OFTReal,
            width: 0,
            precision: 0,
        }
    }
}

#[cfg(test)]
impl FeatureCollection {
    /// Name/value pairs of the feature at `index`. Names are not guaranteed to be unique.
    pub fn attributes(&self, index: usize) -> Vec<(&str, Option<&FieldValue>)> {
        match self.features.get(index) {
            Some(feature) => self
                .fields
                .iter()
                .zip(&feature.values)
                .map(|(field, value)| (field.name.as_str(), value.as_ref()))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use gdal::vector::{FieldValue, OGRwkbGeometryType};
    use rstest::rstest;

    use super::{Feature, FeatureCollection, FeatureGeometry, FieldDefinition, GEOMETRY_COLUMN};

    fn collection() -> FeatureCollection {
        FeatureCollection {
            fields: vec![FieldDefinition::string("name"), FieldDefinition::integer("count")],
            features: vec![Feature {
                geometry: Some(geo::Geometry::Point(geo::Point::new(16.37, 48.21)).into()),
                values: vec![Some(FieldValue::StringValue("Wien".to_string())), None],
            }],
            spatial_ref: None,
            geometry_type: OGRwkbGeometryType::wkbUnknown,
            driver_name: "ESRI Shapefile".to_string(),
        }
    }

    #[rstest]
    fn test_columns_end_with_geometry() {
        assert_eq!(collection().columns(), vec!["name", "count", GEOMETRY_COLUMN]);
    }

    #[rstest]
    fn test_attributes_pair_names_with_values() {
        let collection = collection();
        let attributes = collection.attributes(0);
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].0, "name");
        assert_eq!(
            attributes[0].1.cloned().and_then(|value| value.into_string()),
            Some("Wien".to_string())
        );
        assert_eq!(attributes[1].0, "count");
        assert!(attributes[1].1.is_none());
        assert!(collection.attributes(1).is_empty());
    }

    #[rstest]
    #[case("POINT (16.37 48.21)", false)]
    #[case("POLYGON ((0 0,1 0,1 1,0 0))", false)]
    #[case("POINT (16.37 48.21 171.5)", true)]
    #[case("LINESTRING (0 0 1,1 1 2)", true)]
    fn test_geometries_outside_2d_keep_their_wkb(#[case] wkt: &str, #[case] kept_as_wkb: bool) {
        let gdal_geometry = gdal::vector::Geometry::from_wkt(wkt).unwrap();
        let geometry = FeatureGeometry::from_gdal(&gdal_geometry).unwrap();
        match geometry {
            FeatureGeometry::Wkb(ref wkb) => {
                assert!(kept_as_wkb);
                assert_eq!(wkb, &gdal_geometry.wkb().unwrap());
            }
            FeatureGeometry::Geo(_) => assert!(!kept_as_wkb),
        }
        assert_eq!(
            gdal::vector::Geometry::from_wkb(&geometry.to_wkb().unwrap())
                .unwrap()
                .geometry_type(),
            gdal_geometry.geometry_type()
        );
    }
}
