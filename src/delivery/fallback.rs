//! Placeholder distances for when the Distance Matrix API is unavailable.
//!
//! The destination is matched against suburb lists by substring and a
//! pseudo-random distance is drawn from the bucket's range. These are not real
//! distances; callers mark the result as an estimate.

use std::ops::Range;

use rand::Rng;

const CLOSE_SUBURBS: &[&str] = &[
    "smithfield",
    "fairfield",
    "wetherill park",
    "prairiewood",
    "guildford",
    "merrylands",
    "granville",
    "yennora",
    "cabramatta",
    "canley vale",
    "greystanes",
    "pemulwuy",
];

const MID_SUBURBS: &[&str] = &[
    "parramatta",
    "blacktown",
    "liverpool",
    "bankstown",
    "auburn",
    "lidcombe",
    "strathfield",
    "baulkham hills",
    "castle hill",
    "seven hills",
    "rouse hill",
    "moorebank",
    "ryde",
];

const FAR_SUBURBS: &[&str] = &[
    "sydney",
    "penrith",
    "campbelltown",
    "camden",
    "hornsby",
    "chatswood",
    "manly",
    "bondi",
    "cronulla",
    "sutherland",
    "richmond",
    "windsor",
    "wollongong",
    "gosford",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuburbBucket {
    Close,
    Mid,
    Far,
    Unknown,
}

impl SuburbBucket {
    /// Distance range in tenths of a kilometre, upper bound exclusive
    fn tenths_range(&self) -> Range<u32> {
        match self {
            SuburbBucket::Close => 50..150,
            SuburbBucket::Mid => 150..300,
            SuburbBucket::Far => 300..800,
            SuburbBucket::Unknown => 100..400,
        }
    }

    /// Distance range in kilometres, upper bound exclusive
    pub fn range_km(&self) -> Range<f64> {
        let tenths = self.tenths_range();
        f64::from(tenths.start) / 10.0..f64::from(tenths.end) / 10.0
    }
}

/// Bucket a free-text destination. Closer lists win when several match.
pub fn classify(destination: &str) -> SuburbBucket {
    let destination = destination.to_lowercase();
    let matches = |list: &[&str]| list.iter().any(|suburb| destination.contains(suburb));

    if matches(CLOSE_SUBURBS) {
        SuburbBucket::Close
    } else if matches(MID_SUBURBS) {
        SuburbBucket::Mid
    } else if matches(FAR_SUBURBS) {
        SuburbBucket::Far
    } else {
        SuburbBucket::Unknown
    }
}

/// Draw a placeholder distance (km, one decimal place) for a destination.
pub fn fallback_distance<R: Rng + ?Sized>(destination: &str, rng: &mut R) -> f64 {
    let tenths = rng.random_range(classify(destination).tenths_range());
    f64::from(tenths) / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_classify_buckets() {
        assert_eq!(classify("12 Long St, Smithfield NSW 2164"), SuburbBucket::Close);
        assert_eq!(classify("Parramatta NSW"), SuburbBucket::Mid);
        assert_eq!(classify("PENRITH"), SuburbBucket::Far);
        assert_eq!(classify("Alice Springs NT"), SuburbBucket::Unknown);
    }

    #[test]
    fn test_closer_bucket_wins() {
        // "Parramatta Rd, Granville" matches both mid and close lists
        assert_eq!(classify("Parramatta Rd, Granville NSW"), SuburbBucket::Close);
    }

    #[test]
    fn test_fallback_distance_stays_in_bucket_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for destination in ["Fairfield", "Parramatta NSW", "Hornsby", "Darwin"] {
            let range = classify(destination).range_km();
            for _ in 0..500 {
                let distance = fallback_distance(destination, &mut rng);
                assert!(range.contains(&distance), "{destination}: {distance}");
            }
        }
    }

    #[test]
    fn test_mid_bucket_never_reaches_fee_threshold() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let distance = fallback_distance("Parramatta NSW", &mut rng);
            assert!((15.0..30.0).contains(&distance));
        }
    }
}
