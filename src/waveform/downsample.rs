/// Reduce a metering sequence to exactly `bucket_count` bucket means
///
/// Bucket `i` averages `samples[floor(i*N/B) .. ceil((i+1)*N/B)]`. When `N`
/// is not a multiple of `B` adjacent buckets share their boundary sample.
/// A bucket over an empty slice (only possible for `N == 0`) is NaN;
/// renderers draw it at minimum height.
pub fn downsample(samples: &[f32], bucket_count: usize) -> Vec<f32> {
    (0..bucket_count)
        .map(|i| mean(&samples[bucket_range(samples.len(), bucket_count, i)]))
        .collect()
}

/// Sample index range covered by bucket `index`
pub fn bucket_range(len: usize, bucket_count: usize, index: usize) -> std::ops::Range<usize> {
    let start = index * len / bucket_count;
    let end = ((index + 1) * len).div_ceil(bucket_count);
    start..end
}

fn mean(values: &[f32]) -> f32 {
    let sum: f64 = values.iter().map(|&v| v as f64).sum();
    (sum / values.len() as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downsample_length_matches_bucket_count() {
        let samples: Vec<f32> = (0..137).map(|i| -(i as f32)).collect();
        for buckets in [1, 2, 7, 50, 137, 200] {
            assert_eq!(downsample(&samples, buckets).len(), buckets);
        }
    }

    #[test]
    fn test_downsample_zero_buckets() {
        assert!(downsample(&[-10.0, -20.0], 0).is_empty());
    }

    #[test]
    fn test_downsample_single_bucket_is_mean() {
        let buckets = downsample(&[-10.0, -20.0, -30.0], 1);
        assert_eq!(buckets, vec![-20.0]);
    }

    #[test]
    fn test_downsample_shares_boundary_samples() {
        // N=5, B=2: bucket 0 = [0, 3), bucket 1 = [2, 5)
        assert_eq!(bucket_range(5, 2, 0), 0..3);
        assert_eq!(bucket_range(5, 2, 1), 2..5);

        let buckets = downsample(&[-10.0, -20.0, -30.0, -40.0, -50.0], 2);
        assert_eq!(buckets, vec![-20.0, -40.0]);
    }

    #[test]
    fn test_downsample_more_buckets_than_samples() {
        // N=2, B=4: ranges [0,1) [0,1) [1,2) [1,2)
        let buckets = downsample(&[-10.0, -50.0], 4);
        assert_eq!(buckets, vec![-10.0, -10.0, -50.0, -50.0]);
    }
}
