//! Peak detection on a hydrograph.
//!
//! Follows the usual three-stage heuristic:
//! 1. local maxima (flat tops resolve to their midpoint)
//! 2. thinning by minimum distance, keeping the highest peaks first
//! 3. filtering by topographic prominence

/// Indices of all local maxima of `x`.
///
/// A sample is a maximum when it is strictly greater than its left neighbour
/// and the first differing sample to its right is smaller. Plateaus report
/// their (left-biased) midpoint. The first and last samples are never peaks.
pub fn find_local_maxima(x: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }

    let i_max = x.len() - 1;
    let mut i = 1;
    while i < i_max {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < i_max && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                let right_edge = ahead - 1;
                peaks.push((i + right_edge) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Thin `peaks` so that no two survivors are closer than `distance` samples.
///
/// Peaks are visited from highest to lowest; each kept peak removes its
/// lower neighbours inside the exclusion zone. Equal heights favour the
/// later peak. `peaks` must be sorted ascending; the result is too.
pub fn select_by_distance(x: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let mut keep = vec![true; peaks.len()];

    let mut priority: Vec<usize> = (0..peaks.len()).collect();
    priority.sort_by(|&a, &b| x[peaks[a]].total_cmp(&x[peaks[b]]));

    for &j in priority.iter().rev() {
        if !keep[j] {
            continue;
        }
        for k in (0..j).rev() {
            if peaks[j] - peaks[k] >= distance {
                break;
            }
            keep[k] = false;
        }
        for k in j + 1..peaks.len() {
            if peaks[k] - peaks[j] >= distance {
                break;
            }
            keep[k] = false;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

/// Prominence of every peak: its height above the higher of the two lowest
/// points reached before climbing to a higher sample (or the series edge).
pub fn peak_prominences(x: &[f64], peaks: &[usize]) -> Vec<f64> {
    peaks
        .iter()
        .map(|&peak| {
            let height = x[peak];

            let left_min = x[..=peak]
                .iter()
                .rev()
                .take_while(|&&v| v <= height)
                .copied()
                .fold(height, f64::min);
            let right_min = x[peak..]
                .iter()
                .take_while(|&&v| v <= height)
                .copied()
                .fold(height, f64::min);

            height - left_min.max(right_min)
        })
        .collect()
}

/// Peaks at least `distance` samples apart with prominence `>= min_prominence`.
pub fn find_peaks(x: &[f64], distance: usize, min_prominence: f64) -> Vec<usize> {
    let maxima = find_local_maxima(x);
    let spaced = select_by_distance(x, &maxima, distance);
    let prominences = peak_prominences(x, &spaced);
    spaced
        .into_iter()
        .zip(prominences)
        .filter_map(|(p, prom)| (prom >= min_prominence).then_some(p))
        .collect()
}
