use radiolab_api::endpoints::{images::Image, AngleMeasurement};

pub const HALLUX_VALGUS: &str = "Hallux Valgus angle";
pub const INTERMETATARSAL: &str = "Intermetatarsal angle";
pub const PASA: &str = "PASA angle";
pub const DASA: &str = "DASA angle";

/// One radiograph offered for analysis. Projects whose image list is unavailable
/// still analyze by position.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisTarget {
    pub index: usize,
    pub name: String,
}

impl AnalysisTarget {
    pub fn from_images(images: &[Image], image_count: u32) -> Vec<Self> {
        if images.is_empty() {
            return (0..image_count as usize)
                .map(|index| Self {
                    index,
                    name: format!("Image {}", index + 1),
                })
                .collect();
        }

        images
            .iter()
            .enumerate()
            .map(|(index, image)| Self {
                index,
                name: image.name.clone(),
            })
            .collect()
    }
}

/// Produces angle measurements for a radiograph.
pub trait AngleDetector: Send + Sync {
    fn detect(&self, target: &AnalysisTarget) -> Vec<AngleMeasurement>;
}

/// Stand-in detector that cycles through fixed measurement sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedDetector;

const CANNED_SETS: [[u32; 4]; 3] = [[23, 12, 8, 6], [18, 10, 7, 5], [25, 14, 9, 7]];

impl AngleDetector for SimulatedDetector {
    fn detect(&self, target: &AnalysisTarget) -> Vec<AngleMeasurement> {
        let set = CANNED_SETS[target.index % CANNED_SETS.len()];
        [HALLUX_VALGUS, INTERMETATARSAL, PASA, DASA]
            .into_iter()
            .zip(set)
            .map(|(label, degrees)| AngleMeasurement::new(label, format!("{degrees}°")))
            .collect()
    }
}

/// Runs `detector` over every target, keeping the target order.
pub fn analyze_all(
    detector: &dyn AngleDetector,
    targets: &[AnalysisTarget],
) -> Vec<Vec<AngleMeasurement>> {
    targets.iter().map(|target| detector.detect(target)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiolab_api::endpoints::{ImageId, ProjectId};

    fn image(name: &str) -> Image {
        Image {
            id: ImageId::new(name),
            project_id: ProjectId::new(1),
            name: name.to_string(),
            url: String::new(),
            content_type: "image/png".to_string(),
            size: 10,
            uploaded_at: String::new(),
        }
    }

    #[test]
    fn test_first_set_values() {
        let target = AnalysisTarget {
            index: 0,
            name: "left.png".to_string(),
        };
        let angles = SimulatedDetector.detect(&target);

        assert_eq!(
            angles,
            vec![
                AngleMeasurement::new(HALLUX_VALGUS, "23°"),
                AngleMeasurement::new(INTERMETATARSAL, "12°"),
                AngleMeasurement::new(PASA, "8°"),
                AngleMeasurement::new(DASA, "6°"),
            ]
        );
    }

    #[test]
    fn test_sets_cycle_by_position() {
        let targets = AnalysisTarget::from_images(&[], 4);
        let results = analyze_all(&SimulatedDetector, &targets);

        assert_eq!(results.len(), 4);
        assert_eq!(results[1][0].value, "18°");
        assert_eq!(results[2][0].value, "25°");
        assert_eq!(results[3], results[0]);
    }

    #[test]
    fn test_targets_prefer_loaded_images() {
        let targets = AnalysisTarget::from_images(&[image("a.png"), image("b.png")], 5);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[1].name, "b.png");

        let placeholders = AnalysisTarget::from_images(&[], 2);
        assert_eq!(placeholders[1].name, "Image 2");
    }
}
