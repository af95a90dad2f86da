#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(improper_ctypes)]

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::ptr;

    #[test]
    fn create_matrix_from_dense() {
        let data = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut handle = ptr::null_mut();
        let ret = unsafe { XGDMatrixCreateFromMat(data.as_ptr(), 2, 3, f32::NAN, &mut handle) };
        assert_eq!(ret, 0);

        let mut num_rows = 0;
        assert_eq!(unsafe { XGDMatrixNumRow(handle, &mut num_rows) }, 0);
        assert_eq!(num_rows, 2);

        assert_eq!(unsafe { XGDMatrixFree(handle) }, 0);
    }

    #[test]
    fn unknown_file_sets_last_error() {
        let fname = b"/does/not/exist.libsvm\0";
        let mut handle = ptr::null_mut();
        let ret = unsafe { XGDMatrixCreateFromFile(fname.as_ptr() as *const _, 1, &mut handle) };
        assert_eq!(ret, -1);

        let msg = unsafe { CStr::from_ptr(XGBGetLastError()) };
        assert!(!msg.to_bytes().is_empty());
    }
}
