use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::batch::resample_batch;
use crate::data::model::{Grid, Trace, TraceSet};
use crate::error::Result;
use crate::resample::{
    baseline, baseline_aware_interpolate, integrating_average, nearest_bin_max,
    snapped_linear_interpolate,
};

// ---------------------------------------------------------------------------
// Method – the caller's choice of resampler
// ---------------------------------------------------------------------------

/// Which resampler to run, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Method {
    /// [`nearest_bin_max`]
    NearestBinMax,
    /// [`snapped_linear_interpolate`]
    SnappedLinear,
    /// [`baseline_aware_interpolate`]
    BaselineAware { baselevel: f64, basespace: f64 },
    /// [`integrating_average`]
    IntegratingAverage,
}

impl Method {
    /// Resample one trace onto `grid`.
    pub fn apply(&self, trace: &Trace<'_>, grid: &Grid) -> Result<Vec<f64>> {
        match *self {
            Method::NearestBinMax => nearest_bin_max(trace, grid),
            Method::SnappedLinear => snapped_linear_interpolate(trace, grid),
            Method::BaselineAware {
                baselevel,
                basespace,
            } => baseline_aware_interpolate(trace, grid, baselevel, basespace),
            Method::IntegratingAverage => integrating_average(trace, grid),
        }
    }

    /// Parameter checks that do not depend on the trace.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Method::BaselineAware {
                baselevel,
                basespace,
            } => baseline::check_parameters(baselevel, basespace),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// ResamplePlan – grid + method, loadable from JSON
// ---------------------------------------------------------------------------

/// A complete resampling job description.
///
/// ```json
/// { "grid": { "start": 100.0, "end": 200.0, "count": 101 },
///   "method": { "kind": "baseline_aware", "baselevel": 0.0, "basespace": 0.075 } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResamplePlan {
    pub grid: Grid,
    pub method: Method,
}

impl ResamplePlan {
    pub fn new(grid: Grid, method: Method) -> Result<Self> {
        let plan = ResamplePlan { grid, method };
        plan.validate()?;
        Ok(plan)
    }

    /// Parse and validate a JSON plan.
    pub fn from_json(text: &str) -> Result<Self> {
        let plan: ResamplePlan = serde_json::from_str(text)?;
        plan.validate()?;
        Ok(plan)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.method.validate()
    }

    /// Resample a single trace.
    pub fn run(&self, trace: &Trace<'_>) -> Result<Vec<f64>> {
        self.method.apply(trace, &self.grid)
    }

    /// Resample every trace of a set, one output row per trace.
    pub fn run_batch(&self, set: &TraceSet) -> Result<Array2<f64>> {
        resample_batch(set, &self.grid, &self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResampleError;

    #[test]
    fn parses_tagged_methods() {
        let plan = ResamplePlan::from_json(
            r#"{ "grid": { "start": 100.0, "end": 200.0, "count": 101 },
                 "method": { "kind": "baseline_aware", "baselevel": 0.5, "basespace": 0.075 } }"#,
        )
        .unwrap();
        assert_eq!(plan.grid.count, 101);
        assert_eq!(
            plan.method,
            Method::BaselineAware {
                baselevel: 0.5,
                basespace: 0.075
            }
        );

        let plan = ResamplePlan::from_json(
            r#"{ "grid": { "start": 0.0, "end": 1.0, "count": 2 },
                 "method": { "kind": "integrating_average" } }"#,
        )
        .unwrap();
        assert_eq!(plan.method, Method::IntegratingAverage);
    }

    #[test]
    fn rejects_malformed_and_degenerate_plans() {
        assert!(matches!(
            ResamplePlan::from_json(r#"{ "grid": { "start": 0.0 } }"#),
            Err(ResampleError::InvalidPlan(_))
        ));
        assert!(matches!(
            ResamplePlan::from_json(
                r#"{ "grid": { "start": 1.0, "end": 1.0, "count": 3 },
                     "method": { "kind": "snapped_linear" } }"#
            ),
            Err(ResampleError::NumericDegenerate(_))
        ));
        assert!(matches!(
            ResamplePlan::new(
                Grid::new(0.0, 1.0, 3).unwrap(),
                Method::BaselineAware {
                    baselevel: 0.0,
                    basespace: -0.1
                }
            ),
            Err(ResampleError::NumericDegenerate(_))
        ));
    }

    #[test]
    fn run_dispatches_to_the_chosen_resampler() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 10.0, 0.0, 10.0];
        let trace = Trace::new(&x, &y).unwrap();
        let grid = Grid::new(0.0, 3.0, 4).unwrap();

        let plan = ResamplePlan::new(grid, Method::SnappedLinear).unwrap();
        assert_eq!(plan.run(&trace).unwrap(), vec![0.0, 10.0, 0.0, 10.0]);

        let plan = ResamplePlan::new(grid, Method::NearestBinMax).unwrap();
        assert_eq!(plan.run(&trace).unwrap(), vec![0.0, 10.0, 0.0, 10.0]);
    }
}
