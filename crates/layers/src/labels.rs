use formats::BoundaryFeature;
use foundation::math::{ProjectionContext, Vec3};

use crate::extrude::planar_to_world;

/// Where a region's name label sits in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAnchor {
    pub id: String,
    pub name: String,
    pub position: Vec3,
}

/// One anchor per feature that carries a centroid, at `elevation`.
///
/// Features without a centroid get no label; nothing is guessed from their rings.
pub fn label_anchors(
    features: &[BoundaryFeature],
    proj: &ProjectionContext,
    elevation: f64,
) -> Vec<LabelAnchor> {
    features
        .iter()
        .filter_map(|f| {
            let centroid = f.centroid.filter(|c| c.is_finite())?;
            Some(LabelAnchor {
                id: f.id.clone(),
                name: f.name.clone(),
                position: planar_to_world(proj.project(centroid), elevation),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::label_anchors;
    use formats::BoundaryFeature;
    use foundation::math::{GeoPoint, ProjectionContext, ProjectionParams};

    fn region(id: &str, centroid: Option<GeoPoint>) -> BoundaryFeature {
        BoundaryFeature {
            id: id.into(),
            name: format!("{id} name"),
            centroid,
            ring_sets: vec![vec![vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(2.0, 0.0),
                GeoPoint::new(2.0, 2.0),
                GeoPoint::new(0.0, 2.0),
            ]]],
            child_count: 0,
            child_dataset: None,
        }
    }

    #[test]
    fn anchors_only_for_features_with_centroid() {
        let features = vec![
            region("a", Some(GeoPoint::new(1.0, 1.0))),
            region("b", None),
            region("c", Some(GeoPoint::new(f64::NAN, 1.0))),
        ];
        let proj = ProjectionContext::fit(
            features.iter().flat_map(|f| f.ring_sets.iter().map(|r| r.as_slice())),
            ProjectionParams::default(),
        )
        .expect("fit");

        let anchors = label_anchors(&features, &proj, 1.2);
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].id, "a");
        assert_eq!(anchors[0].name, "a name");
        assert!((anchors[0].position.z - 1.2).abs() < 1e-12);
        // Centroid of the only square is the projection centre.
        assert!(anchors[0].position.x.abs() < 1e-6);
        assert!(anchors[0].position.y.abs() < 1e-3);
    }
}
