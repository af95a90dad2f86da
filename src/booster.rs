use std::{ffi, ptr, slice};

use xgboost_sys;

use crate::dmatrix::DMatrix;
use crate::error::{XGBError, XGBResult};
use crate::parameters::{BoosterParameters, TrainingParameters};

/// Gradient boosted tree model, owned by the native library.
pub struct Booster {
    handle: xgboost_sys::BoosterHandle,
}

impl Booster {
    /// Create a new booster with the given parameters, caching the given matrices.
    pub fn create(dmats: &[&DMatrix], params: &BoosterParameters) -> XGBResult<Self> {
        let mut handle = ptr::null_mut();
        let s: Vec<xgboost_sys::DMatrixHandle> = dmats.iter().map(|x| x.handle).collect();
        xgb_call!(xgboost_sys::XGBoosterCreate(
            s.as_ptr(),
            dmats.len() as xgboost_sys::bst_ulong,
            &mut handle
        ))?;

        let mut booster = Booster { handle };
        booster.set_params(params)?;
        Ok(booster)
    }

    /// Train a new model for `boost_rounds` rounds.
    ///
    /// After each round the evaluation sets (if any) are scored and the result line is printed to
    /// standard output as `[round]\tname-metric:value...`, the same layout XGBoost uses itself.
    pub fn train(params: &TrainingParameters) -> XGBResult<Self> {
        let mut cached_dmats = vec![params.dtrain];
        if let Some(eval_sets) = params.evaluation_sets {
            for (dmat, _) in eval_sets {
                cached_dmats.push(*dmat);
            }
        }

        let mut bst = Booster::create(&cached_dmats, &params.booster_params)?;
        for i in 0..params.boost_rounds as i32 {
            bst.update(params.dtrain, i)?;

            if let Some(eval_sets) = params.evaluation_sets {
                let result = bst.eval_set(eval_sets, i)?;
                println!("{}", result);
            }
        }

        Ok(bst)
    }

    pub fn set_params(&mut self, p: &BoosterParameters) -> XGBResult<()> {
        for (key, value) in p.as_string_pairs() {
            debug!("Setting parameter: {}={}", &key, &value);
            self.set_param(&key, &value)?;
        }
        Ok(())
    }

    /// Run one boosting iteration on `dtrain`.
    pub fn update(&mut self, dtrain: &DMatrix, iteration: i32) -> XGBResult<()> {
        xgb_call!(xgboost_sys::XGBoosterUpdateOneIter(self.handle, iteration, dtrain.handle))
    }

    /// Score the model on the named matrices, returning XGBoost's formatted evaluation line.
    pub fn eval_set(&self, evals: &[(&DMatrix, &str)], iteration: i32) -> XGBResult<String> {
        let mut s: Vec<xgboost_sys::DMatrixHandle> = evals.iter().map(|(dmat, _)| dmat.handle).collect();

        // CStrings must outlive the call, only their pointers are handed over
        let names = evals
            .iter()
            .map(|(_, name)| ffi::CString::new(*name).map_err(|e| XGBError::new(e.to_string())))
            .collect::<XGBResult<Vec<_>>>()?;
        let mut name_ptrs: Vec<*const libc::c_char> = names.iter().map(|n| n.as_ptr()).collect();

        let mut out_result = ptr::null();
        xgb_call!(xgboost_sys::XGBoosterEvalOneIter(
            self.handle,
            iteration,
            s.as_mut_ptr(),
            name_ptrs.as_mut_ptr(),
            evals.len() as xgboost_sys::bst_ulong,
            &mut out_result
        ))?;
        let out = unsafe { ffi::CStr::from_ptr(out_result) };
        Ok(out.to_string_lossy().into_owned())
    }

    /// Predict results for the given matrix.
    ///
    /// One value per row, except for multi-output objectives which return `rows * outputs`
    /// values in row-major order.
    pub fn predict(&self, dmat: &DMatrix) -> XGBResult<Vec<f32>> {
        let option_mask = 0;
        let ntree_limit = 0;
        let mut out_len = 0;
        let mut out_result = ptr::null();
        xgb_call!(xgboost_sys::XGBoosterPredict(
            self.handle,
            dmat.handle,
            option_mask,
            ntree_limit,
            &mut out_len,
            &mut out_result
        ))?;

        if out_len == 0 {
            return Ok(Vec::new());
        }
        let s = unsafe { slice::from_raw_parts(out_result, out_len as usize) };
        Ok(s.to_vec())
    }

    fn set_param(&mut self, name: &str, value: &str) -> XGBResult<()> {
        let name = ffi::CString::new(name).map_err(|e| XGBError::new(e.to_string()))?;
        let value = ffi::CString::new(value).map_err(|e| XGBError::new(e.to_string()))?;
        xgb_call!(xgboost_sys::XGBoosterSetParam(self.handle, name.as_ptr(), value.as_ptr()))
    }
}

impl Drop for Booster {
    fn drop(&mut self) {
        if let Err(e) = xgb_call!(xgboost_sys::XGBoosterFree(self.handle)) {
            error!("Failed to free Booster: {}", e);
        }
    }
}
