//! Fitted values, residuals and coefficients from a QR factorisation.

mod util;

#[cfg(feature = "linear_algebra")]
mod qr_projection_tests {
    use qr_kernels::errors::KernelError;
    use qr_kernels::kernels::scientific::projection::QrProjector;
    use qr_kernels::kernels::scientific::qr::QrFactors;

    use super::util::{TOL, assert_close, assert_slice_close, column, random_matrix, seeded};

    // intercept + slope design on x = 1..4, column-major
    const X: [f64; 8] = [1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 3.0, 4.0];
    const Y: [f64; 4] = [1.0, 3.0, 2.0, 5.0];

    #[test]
    fn simple_regression_matches_closed_form() {
        let f = QrFactors::factorise(&X, 4, 2).unwrap();
        let mut p = QrProjector::new(f.view(), f.qraux()).unwrap();
        assert_eq!((p.nobs(), p.ncoef()), (4, 2));

        // slope = Sxy / Sxx = 5.5 / 5, intercept = ȳ − slope·x̄ = 0
        let beta = p.coefficients(&Y).unwrap();
        assert_eq!(beta.data.len(), 2);
        assert_close(beta.data[0], 0.0, TOL);
        assert_close(beta.data[1], 1.1, TOL);

        let fit = p.fitted(&Y).unwrap();
        let res = p.residuals(&Y).unwrap();
        let expect_fit = [1.1, 2.2, 3.3, 4.4];
        let expect_res = [-0.1, 0.8, -1.3, 0.6];
        for i in 0..4 {
            assert_close(fit.data[i], expect_fit[i], TOL);
            assert_close(res.data[i], expect_res[i], TOL);
        }
    }

    #[test]
    fn fitted_plus_residuals_is_response() {
        let mut rng = seeded(23);
        let (nobs, ncoef) = (50, 6);
        let x = random_matrix(&mut rng, nobs, ncoef);
        let y = random_matrix(&mut rng, nobs, 1);
        let f = QrFactors::factorise(&x, nobs, ncoef).unwrap();
        let mut p = QrProjector::new(f.view(), f.qraux()).unwrap();

        let fit = p.fitted(&y).unwrap();
        let res = p.residuals(&y).unwrap();
        for i in 0..nobs {
            assert_close(fit.data[i] + res.data[i], y[i], 1e-12);
        }

        // residuals are orthogonal to every design column
        for j in 0..ncoef {
            let dot: f64 = column(&x, nobs, j)
                .iter()
                .enumerate()
                .map(|(i, v)| v * res.data[i])
                .sum();
            assert!(dot.abs() < 1e-10, "column {j}: {dot}");
        }
    }

    #[test]
    fn coefficients_reproduce_fitted_values() {
        let mut rng = seeded(29);
        let (nobs, ncoef) = (30, 4);
        let x = random_matrix(&mut rng, nobs, ncoef);
        let y = random_matrix(&mut rng, nobs, 1);
        let f = QrFactors::factorise(&x, nobs, ncoef).unwrap();
        let mut p = QrProjector::new(f.view(), f.qraux()).unwrap();

        let beta = p.coefficients(&y).unwrap();
        let fit = p.fitted(&y).unwrap();
        for i in 0..nobs {
            let xb: f64 = (0..ncoef).map(|j| x[i + j * nobs] * beta.data[j]).sum();
            assert_close(xb, fit.data[i], 1e-10);
        }
    }

    #[test]
    fn residuals_in_place_matches_allocating_version() {
        let f = QrFactors::factorise(&X, 4, 2).unwrap();
        let mut p = QrProjector::new(f.view(), f.qraux()).unwrap();
        let res = p.residuals(&Y).unwrap();
        let mut y = Y;
        p.residuals_in_place(&mut y).unwrap();
        let expect: Vec<f64> = (0..4).map(|i| res.data[i]).collect();
        assert_slice_close(&y, &expect, 1e-14);
    }

    #[test]
    fn response_in_column_space_has_zero_residuals() {
        let f = QrFactors::factorise(&X, 4, 2).unwrap();
        let mut p = QrProjector::new(f.view(), f.qraux()).unwrap();
        // y = 2 + 3x
        let y = [5.0, 8.0, 11.0, 14.0];
        let res = p.residuals(&y).unwrap();
        for i in 0..4 {
            assert!(res.data[i].abs() < 1e-12);
        }
        let beta = p.coefficients(&y).unwrap();
        assert_close(beta.data[0], 2.0, TOL);
        assert_close(beta.data[1], 3.0, TOL);
    }

    #[test]
    fn wrong_response_length_is_rejected() {
        let f = QrFactors::factorise(&X, 4, 2).unwrap();
        let mut p = QrProjector::new(f.view(), f.qraux()).unwrap();
        assert!(matches!(
            p.fitted(&[1.0, 2.0, 3.0]),
            Err(KernelError::LengthMismatch(_))
        ));
        assert!(matches!(
            p.coefficients(&[1.0; 5]),
            Err(KernelError::LengthMismatch(_))
        ));
    }
}
