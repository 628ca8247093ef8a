use crate::script::NetworkKind;

const POOR: f64 = 70.0;
const AVERAGE: f64 = 80.0;
const GOOD: f64 = 90.0;

/// Picks the personalised verdict shown under the accuracy chart.
///
/// Thresholds are 70 / 80 / 90 percent; `None` gets the generic wording.
pub fn verdict(network_type: Option<NetworkKind>, accuracy: f64) -> &'static str {
    let tier = if accuracy < POOR {
        0
    } else if accuracy < AVERAGE {
        1
    } else if accuracy < GOOD {
        2
    } else {
        3
    };

    let messages: [&'static str; 4] = match network_type {
        Some(NetworkKind::IrisScanning) => [
            "Ooh! Not a good iris scanning model! Try adding more layers or training for more rounds!",
            "This iris scanning model is okay, but could be better with more specialized layers.",
            "Good job! This is a solid iris scanning model that can identify most iris patterns.",
            "Excellent iris scanning model! This could be used in real security systems!",
        ],
        Some(NetworkKind::ImageRecog) => [
            "Ooh! Not a good image recognition model! Try harder with different layer combinations!",
            "This image recognition model needs improvement. Try adding more special layers.",
            "Nice work! This image recognition model can identify most common objects.",
            "Outstanding image recognition model! This could compete with commercial systems!",
        ],
        Some(NetworkKind::ClimatePred) => [
            "Ooh! Not a good climate prediction model! Weather forecasting is hard - try more layers!",
            "This climate prediction model is basic. It might predict obvious weather patterns.",
            "Good climate prediction model! It can forecast weather trends with decent accuracy.",
            "Excellent climate prediction model! This could help meteorologists make better forecasts!",
        ],
        None => [
            "This model needs significant improvement. Try a different architecture.",
            "This model performs adequately but has room for improvement.",
            "This is a good model with solid performance metrics.",
            "Excellent model! The performance metrics are very impressive.",
        ],
    };

    messages[tier]
}
