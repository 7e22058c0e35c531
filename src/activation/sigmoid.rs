use crate::math::matrix::Matrix;

/// Logistic function `1 / (1 + e^-x)`.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the logistic function, evaluated at the pre-activation `z`.
pub fn sigmoid_derivative(z: f64) -> f64 {
    let s = sigmoid(z);
    s * (1.0 - s)
}

pub fn sigmoid_matrix(z: &Matrix) -> Matrix {
    z.map(sigmoid)
}

pub fn sigmoid_derivative_matrix(z: &Matrix) -> Matrix {
    z.map(sigmoid_derivative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sigmoid_at_zero_is_one_half() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert_eq!(sigmoid_derivative(0.0), 0.25);
    }

    proptest! {
        #[test]
        fn sigmoid_stays_inside_unit_interval(x in -30.0f64..30.0) {
            let s = sigmoid(x);
            prop_assert!(s > 0.0 && s < 1.0);
            let d = sigmoid_derivative(x);
            prop_assert!(d > 0.0 && d <= 0.25);
        }
    }
}
