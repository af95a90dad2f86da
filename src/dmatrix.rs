use libc::c_float;
use std::{ffi, ptr, slice};

use xgboost_sys;

use crate::error::{XGBError, XGBResult};

static KEY_LABEL: &str = "label";

/// Data matrix handed to XGBoost for training and prediction.
///
/// Holds the features of every instance (one row each) plus an optional ground truth label
/// per row. Built from dense row-major buffers or sparse
/// [CSR](https://en.wikipedia.org/wiki/Sparse_matrix#Compressed_sparse_row_(CSR,_CRS_or_Yale_format))
/// matrices; the benchmark datasets produce one or the other depending on their source format.
///
/// # Examples
///
/// ```
/// use xgb_fpga_bench::DMatrix;
///
/// let data = &[1.0, 0.5, 0.2, 0.2,
///              0.7, 1.0, 0.1, 0.1,
///              0.2, 0.0, 0.0, 1.0];
/// let mut dmat = DMatrix::from_dense(data, 3).unwrap();
/// assert_eq!(dmat.shape(), (3, 4));
/// dmat.set_labels(&[1.0, 0.0, 1.0]).unwrap();
/// ```
#[derive(Debug)]
pub struct DMatrix {
    pub(crate) handle: xgboost_sys::DMatrixHandle,
    num_rows: usize,
    num_cols: usize,
}

impl DMatrix {
    /// Construct a new instance from a DMatrixHandle created by the XGBoost C API.
    fn new(handle: xgboost_sys::DMatrixHandle) -> XGBResult<Self> {
        // shape is read once here, rather than checking errors on every XGDMatrixNum* call
        let mut out = 0;
        xgb_call!(xgboost_sys::XGDMatrixNumRow(handle, &mut out))?;
        let num_rows = out as usize;

        let mut out = 0;
        xgb_call!(xgboost_sys::XGDMatrixNumCol(handle, &mut out))?;
        let num_cols = out as usize;

        debug!("Created DMatrix with shape: {}x{}", num_rows, num_cols);
        Ok(DMatrix {
            handle,
            num_rows,
            num_cols,
        })
    }

    /// Create a new `DMatrix` from a dense array in row-major order.
    ///
    /// `data.len()` must be a multiple of `num_rows`.
    pub fn from_dense(data: &[f32], num_rows: usize) -> XGBResult<Self> {
        if num_rows == 0 || data.len() % num_rows != 0 {
            return Err(XGBError::new(format!(
                "dense buffer of {} values cannot be split into {} rows",
                data.len(),
                num_rows
            )));
        }
        let mut handle = ptr::null_mut();
        xgb_call!(xgboost_sys::XGDMatrixCreateFromMat(
            data.as_ptr(),
            num_rows as xgboost_sys::bst_ulong,
            (data.len() / num_rows) as xgboost_sys::bst_ulong,
            f32::NAN,
            &mut handle
        ))?;
        DMatrix::new(handle)
    }

    /// Create a new `DMatrix` from a sparse CSR matrix.
    ///
    /// The column indices for row _i_ are stored in `indices[indptr[i]..indptr[i+1]]` and their
    /// values in `data[indptr[i]..indptr[i+1]]`.
    ///
    /// If `num_cols` is `None` the width is inferred by XGBoost from the largest index present,
    /// which can make train and test matrices disagree; pass it whenever it is known.
    pub fn from_csr(indptr: &[usize], indices: &[u32], data: &[f32], num_cols: Option<usize>) -> XGBResult<Self> {
        if indices.len() != data.len() {
            return Err(XGBError::new(format!(
                "CSR indices ({}) and data ({}) lengths differ",
                indices.len(),
                data.len()
            )));
        }
        let mut handle = ptr::null_mut();
        let num_cols = num_cols.unwrap_or(0); // infer from data if 0
        xgb_call!(xgboost_sys::XGDMatrixCreateFromCSREx(
            indptr.as_ptr(),
            indices.as_ptr(),
            data.as_ptr(),
            indptr.len(),
            data.len(),
            num_cols,
            &mut handle
        ))?;
        DMatrix::new(handle)
    }

    /// Get the number of rows in this matrix.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Get the number of columns in this matrix.
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Get the shape (rows x columns) of this matrix.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_cols())
    }

    /// Get ground truth labels for each row of this matrix.
    pub fn get_labels(&self) -> XGBResult<&[f32]> {
        self.get_float_info(KEY_LABEL)
    }

    /// Set ground truth labels for each row of this matrix.
    pub fn set_labels(&mut self, array: &[f32]) -> XGBResult<()> {
        if array.len() != self.num_rows {
            return Err(XGBError::new(format!(
                "got {} labels for a matrix with {} rows",
                array.len(),
                self.num_rows
            )));
        }
        self.set_float_info(KEY_LABEL, array)
    }

    fn get_float_info(&self, field: &str) -> XGBResult<&[f32]> {
        let field = ffi::CString::new(field).map_err(|e| XGBError::new(e.to_string()))?;
        let mut out_len = 0;
        let mut out_dptr = ptr::null();
        xgb_call!(xgboost_sys::XGDMatrixGetFloatInfo(
            self.handle,
            field.as_ptr(),
            &mut out_len,
            &mut out_dptr
        ))?;

        if out_len == 0 {
            return Ok(&[]);
        }
        Ok(unsafe { slice::from_raw_parts(out_dptr as *const c_float, out_len as usize) })
    }

    fn set_float_info(&mut self, field: &str, array: &[f32]) -> XGBResult<()> {
        let field = ffi::CString::new(field).map_err(|e| XGBError::new(e.to_string()))?;
        xgb_call!(xgboost_sys::XGDMatrixSetFloatInfo(
            self.handle,
            field.as_ptr(),
            array.as_ptr(),
            array.len() as xgboost_sys::bst_ulong
        ))
    }
}

impl Drop for DMatrix {
    fn drop(&mut self) {
        if let Err(e) = xgb_call!(xgboost_sys::XGDMatrixFree(self.handle)) {
            error!("Failed to free DMatrix: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_dense() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let dmat = DMatrix::from_dense(&data, 2).unwrap();
        assert_eq!(dmat.shape(), (2, 3));

        let data = vec![1.0, 2.0, 3.0];
        let dmat = DMatrix::from_dense(&data, 3).unwrap();
        assert_eq!(dmat.shape(), (3, 1));
    }

    #[test]
    fn from_dense_rejects_ragged_buffer() {
        assert!(DMatrix::from_dense(&[1.0, 2.0, 3.0], 2).is_err());
        assert!(DMatrix::from_dense(&[], 0).is_err());
    }

    #[test]
    fn from_csr() {
        let indptr = [0, 2, 3, 6, 8];
        let indices = [0, 2, 2, 0, 1, 2, 1, 2];
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];

        let dmat = DMatrix::from_csr(&indptr, &indices, &data, Some(10)).unwrap();
        assert_eq!(dmat.num_rows(), 4);
        assert_eq!(dmat.num_cols(), 10);
    }

    #[test]
    fn from_csr_rejects_mismatched_lengths() {
        assert!(DMatrix::from_csr(&[0, 2], &[0, 1], &[1.0], Some(2)).is_err());
    }

    #[test]
    fn get_set_labels() {
        let mut dmat = DMatrix::from_dense(&[1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert!(dmat.get_labels().unwrap().is_empty());

        dmat.set_labels(&[0.0, 1.0]).unwrap();
        assert_eq!(dmat.get_labels().unwrap(), &[0.0, 1.0]);
    }

    #[test]
    fn set_labels_requires_one_per_row() {
        let mut dmat = DMatrix::from_dense(&[1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert!(dmat.set_labels(&[1.0]).is_err());
    }
}
