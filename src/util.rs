pub fn mean(data: &[f64]) -> Option<f64> {
    match data.len() {
        0 => None,
        count => Some(data.iter().sum::<f64>() / count as f64),
    }
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}

/// Mean and standard deviation of signed hit offsets in ms.
pub fn offset_stats(offsets: &[i64]) -> Option<(f64, f64)> {
    let data = offsets.iter().map(|&o| o as f64).collect::<Vec<_>>();
    Some((mean(&data)?, std_dev(&data)?))
}

/// Unstable rate: ten times the standard deviation of the hit offsets.
pub fn unstable_rate(offsets: &[i64]) -> Option<f64> {
    offset_stats(offsets).map(|(_, sd)| sd * 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10., 20., 30., 15., 22.]), Some(19.4));
        assert_eq!(mean(&[-10.0, 0.0, 10.0]), Some(0.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_std_dev() {
        assert_eq!(
            std_dev(&[100., 120., 90., 102., 94.]),
            Some(10.322790320451151)
        );
        assert_eq!(std_dev(&[42.0]), Some(0.0));
        assert_eq!(std_dev(&[]), None);
    }

    #[test]
    fn test_offset_stats() {
        assert_eq!(offset_stats(&[-20, 20]), Some((0.0, 20.0)));
        assert_eq!(offset_stats(&[]), None);
    }

    #[test]
    fn test_unstable_rate() {
        assert_eq!(unstable_rate(&[-20, 20, -20, 20]), Some(200.0));
        assert_eq!(unstable_rate(&[5]), Some(0.0));
    }
}
