//! Hypergeometric overrepresentation test for a single pathway.
//!
//! With a background of N features, a pathway of K features and a foreground
//! sample of n features, the p-value is the probability of seeing at least the
//! observed overlap k under random sampling without replacement:
//!
//! p = Σ_{i=k}^{min(K,n)} C(K,i)·C(N−K,n−i) / C(N,n)

use pathwise_common::{FeatureSet, PathwiseError, Result};
use serde::{Deserialize, Serialize};

use crate::numeric::log_choose;

/// Parameters of one upper-tail test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HypergeometricParams {
    /// N
    pub background_size: u64,
    /// K
    pub pathway_size: u64,
    /// n
    pub sample_size: u64,
    /// k
    pub observed: u64,
}

impl HypergeometricParams {
    pub fn new(background_size: u64, pathway_size: u64, sample_size: u64, observed: u64) -> Self {
        Self { background_size, pathway_size, sample_size, observed }
    }

    /// Largest overlap the parameters allow.
    pub fn max_overlap(&self) -> u64 {
        self.pathway_size.min(self.sample_size)
    }

    /// Checks `K <= N`, `n <= N` and `k <= min(K, n)`.
    pub fn validate(&self) -> Result<()> {
        let Self { background_size: n_bg, pathway_size: k_pw, sample_size: n_fg, observed: k } = *self;
        if k_pw > n_bg {
            return Err(PathwiseError::invalid(format!(
                "pathway size {k_pw} exceeds background size {n_bg}"
            )));
        }
        if n_fg > n_bg {
            return Err(PathwiseError::invalid(format!(
                "foreground size {n_fg} exceeds background size {n_bg}"
            )));
        }
        if k > self.max_overlap() {
            return Err(PathwiseError::invalid(format!(
                "overlap {k} exceeds min(pathway size {k_pw}, foreground size {n_fg})"
            )));
        }
        Ok(())
    }

    /// Background, pathway or foreground is empty.
    pub fn is_degenerate(&self) -> bool {
        self.background_size == 0 || self.pathway_size == 0 || self.sample_size == 0
    }

    /// (k/n) / (K/N); 0 when either ratio is undefined.
    pub fn fold_enrichment(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let observed_ratio = self.observed as f64 / self.sample_size as f64;
        let expected_ratio = self.pathway_size as f64 / self.background_size as f64;
        observed_ratio / expected_ratio
    }
}

/// P(X = i). Zero where the configuration is impossible (n − i > N − K).
/// Parameters failing [`HypergeometricParams::validate`] are rejected.
pub fn pmf(params: &HypergeometricParams, i: u64) -> Result<f64> {
    params.validate()?;
    let HypergeometricParams { background_size, pathway_size, sample_size, .. } = *params;
    if i > pathway_size || i > sample_size {
        return Ok(0.0);
    }
    let outside = background_size - pathway_size;
    if sample_size - i > outside {
        return Ok(0.0);
    }
    let log_p = log_choose(pathway_size, i)? + log_choose(outside, sample_size - i)?
        - log_choose(background_size, sample_size)?;
    Ok(log_p.exp())
}

/// P(X >= k). Terms are accumulated from the far tail inward, so the result
/// is exactly non-increasing in k for fixed N, K and n.
pub fn upper_tail(params: &HypergeometricParams) -> Result<f64> {
    params.validate()?;
    if params.observed == 0 || params.is_degenerate() {
        return Ok(1.0);
    }

    let mut p = 0.0f64;
    for i in (params.observed..=params.max_overlap()).rev() {
        p += pmf(params, i)?;
    }
    Ok(p.min(1.0))
}

/// Overlap and p-value of one pathway against one foreground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathwayScore {
    pub overlap: u64,
    pub p_value: f64,
}

/// Count `foreground ∩ pathway` and test it against a background of
/// `background_size` features. Both sets are expected to be subsets of the
/// background already; anything else surfaces as `InvalidArgument`.
pub fn score_pathway(
    foreground: &FeatureSet,
    pathway: &FeatureSet,
    background_size: usize,
) -> Result<PathwayScore> {
    let overlap = foreground.intersection_count(pathway) as u64;
    let params = HypergeometricParams::new(
        background_size as u64,
        pathway.len() as u64,
        foreground.len() as u64,
        overlap,
    );
    let p_value = upper_tail(&params)?;
    Ok(PathwayScore { overlap, p_value })
}
