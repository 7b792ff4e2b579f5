//! utils — Python boundary helpers (feature `python-bindings`).
//!
//! Array extraction from numpy / pandas / sequences and the mapping of every
//! crate error into a Python `ValueError` carrying its `Display` message.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
use crate::{
    aggregation::errors::ScaleError, bayes::errors::CalibError, market::errors::MarketError,
    returns::errors::ReturnsError, simulation::errors::SimError,
    statistical_tests::errors::NormalityError,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray_bound(py).readonly())
}

/// Copy a Python array-like into an owned vector.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vec<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(slice.to_vec())
}

#[cfg(feature = "python-bindings")]
macro_rules! value_error_from {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for PyErr {
                fn from(err: $err) -> PyErr {
                    PyValueError::new_err(err.to_string())
                }
            }
        )*
    };
}

#[cfg(feature = "python-bindings")]
value_error_from!(SimError, ReturnsError, NormalityError, CalibError, MarketError, ScaleError);
