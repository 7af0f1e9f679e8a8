pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(values: &[f32]) -> f32 {
        if values.is_empty() {
            return f32::NAN;
        }
        values.iter().sum::<f32>() / values.len() as f32
    }
}
