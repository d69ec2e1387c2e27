/// Region metadata carried by every mesh and outline built for a feature.
///
/// This is how picking and navigation learn what was hit; nothing correlates
/// meshes to features by position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureTag {
    pub id: String,
    pub name: String,
    pub child_count: u32,
    pub child_dataset: Option<String>,
}

impl FeatureTag {
    /// Dataset to drill into when this region is clicked.
    pub fn drill_target(&self) -> Option<&str> {
        if self.child_count > 0 {
            self.child_dataset.as_deref()
        } else {
            None
        }
    }
}
