//! Reference equation-of-state routines for seawater.
//!
//! Standard published formulas, used as a black-box numeric library by the
//! derivation services: PSS-78 practical salinity (Lewis & Perkin 1981),
//! EOS-80 density and secant bulk modulus, and the UNESCO depth and
//! adiabatic-lapse potential temperature routines (Fofonoff & Millard 1983).
//! Inputs are ITS-90 temperatures in deg C, pressure in dbar, practical
//! salinity on the PSS-78 scale.
//!
//! All functions are pure and scalar; NaN inputs propagate to NaN outputs.

/// Conductivity of standard seawater C(35, 15, 0) in mS/cm
pub const C35150: f64 = 42.9140;

/// ITS-90 to IPTS-68 temperature scale factor
const T68_SCALE: f64 = 1.00024;

/// Reference-composition scale factor from practical to absolute salinity
const SA_SCALE: f64 = 35.16504 / 35.0;

/// Practical salinity from conductivity (mS/cm), temperature and pressure.
///
/// PSS-78, valid for 2 < S < 42. Negative conductivities yield NaN.
pub fn practical_salinity(c_mspcm: f64, t: f64, p: f64) -> f64 {
    if !(c_mspcm.is_finite() && t.is_finite() && p.is_finite()) || c_mspcm <= 0.0 {
        return f64::NAN;
    }
    let t68 = t * T68_SCALE;
    let r = c_mspcm / C35150;

    // rt: temperature dependence of standard seawater conductivity
    let rt = (((1.0031e-9 * t68 - 6.9698e-7) * t68 + 1.104259e-4) * t68 + 2.00564e-2) * t68
        + 0.6766097;

    // Rp: pressure correction to the conductivity ratio
    let e = (2.070e-5 + (-6.370e-10 + 3.989e-15 * p) * p) * p;
    let d = 1.0 + (3.426e-2 + 4.464e-4 * t68) * t68 + (4.215e-1 - 3.107e-3 * t68) * r;
    let rp = 1.0 + e / d;

    let rtq = r / (rp * rt);
    salinity_from_rt(rtq, t68)
}

/// sal(Rt, t68) polynomial of PSS-78
fn salinity_from_rt(rt: f64, t68: f64) -> f64 {
    if rt < 0.0 {
        return f64::NAN;
    }
    let rtx = rt.sqrt();
    let del_t = t68 - 15.0;

    let del_s = (del_t / (1.0 + 0.0162 * del_t))
        * (0.0005
            + (-0.0056 + (-0.0066 + (-0.0375 + (0.0636 - 0.0144 * rtx) * rtx) * rtx) * rtx) * rtx);

    0.0080 + (-0.1692 + (25.3851 + (14.0941 + (-7.0261 + 2.7081 * rtx) * rtx) * rtx) * rtx) * rtx
        + del_s
}

/// Density of standard mean ocean water, EOS-80 (kg/m^3)
fn smow(t68: f64) -> f64 {
    999.842594
        + (6.793952e-2
            + (-9.095290e-3 + (1.001685e-4 + (-1.120083e-6 + 6.536332e-9 * t68) * t68) * t68)
                * t68)
            * t68
}

/// Density of seawater at atmospheric pressure, EOS-80 (kg/m^3)
fn density_at_surface(s: f64, t68: f64) -> f64 {
    let b = 8.24493e-1
        + (-4.0899e-3 + (7.6438e-5 + (-8.2467e-7 + 5.3875e-9 * t68) * t68) * t68) * t68;
    let c = -5.72466e-3 + (1.0227e-4 - 1.6546e-6 * t68) * t68;
    let d = 4.8314e-4;
    smow(t68) + (b + c * s.sqrt() + d * s) * s
}

/// Secant bulk modulus K(S, T, P), EOS-80. Pressure in bar.
fn secant_bulk_modulus(s: f64, t68: f64, p_bar: f64) -> f64 {
    let kw = 19652.21
        + (148.4206
            + (-2.327105 + (1.360477e-2 - 5.155288e-5 * t68) * t68) * t68)
            * t68;
    let k0 = kw
        + (54.6746 + (-0.603459 + (1.09987e-2 - 6.1670e-5 * t68) * t68) * t68) * s
        + (7.944e-2 + (1.6483e-2 - 5.3009e-4 * t68) * t68) * s.powf(1.5);

    let aw = 3.239908 + (1.43713e-3 + (1.16092e-4 - 5.77905e-7 * t68) * t68) * t68;
    let a = aw
        + (2.2838e-3 + (-1.0981e-5 - 1.6078e-6 * t68) * t68) * s
        + 1.91075e-4 * s.powf(1.5);

    let bw = 8.50935e-5 + (-6.12293e-6 + 5.2787e-8 * t68) * t68;
    let b = bw + (-9.9348e-7 + (2.0816e-8 + 9.1697e-10 * t68) * t68) * s;

    k0 + (a + b * p_bar) * p_bar
}

/// In-situ density of seawater, EOS-80 (kg/m^3).
///
/// Salinity on the practical scale, temperature ITS-90 deg C, pressure dbar.
pub fn density(s: f64, t: f64, p: f64) -> f64 {
    if !(s.is_finite() && t.is_finite() && p.is_finite()) || s < 0.0 {
        return f64::NAN;
    }
    let t68 = t * T68_SCALE;
    let p_bar = p / 10.0;
    let d0 = density_at_surface(s, t68);
    if p_bar == 0.0 {
        return d0;
    }
    d0 / (1.0 - p_bar / secant_bulk_modulus(s, t68, p_bar))
}

/// In-situ density at a reference position (kg/m^3).
///
/// In the full TEOS-10 treatment the position selects the regional salinity
/// anomaly; under the reference-composition scaling used here the result
/// reduces to the position-independent EOS-80 form. The position parameters
/// keep the calling convention of the reference library.
pub fn density_at(s: f64, t: f64, p: f64, _lat: f64, _lon: f64) -> f64 {
    density(s, t, p)
}

/// Adiabatic temperature gradient (deg C / dbar), UNESCO
fn adiabatic_gradient(s: f64, t: f64, p: f64) -> f64 {
    let t68 = t * T68_SCALE;
    let ds = s - 35.0;
    (((-2.1687e-16 * t68 + 1.8676e-14) * t68 - 4.6206e-13) * p
        + ((2.7759e-12 * t68 - 1.1351e-10) * ds
            + ((-5.4481e-14 * t68 + 8.733e-12) * t68 - 6.7795e-10) * t68
            + 1.8741e-8))
        * p
        + (-4.2393e-8 * t68 + 1.8932e-6) * ds
        + ((6.6228e-10 * t68 - 6.836e-8) * t68 + 8.5258e-6) * t68
        + 3.5803e-5
}

/// Potential temperature relative to reference pressure `pr` (ITS-90 deg C).
///
/// Fourth-order Runge-Kutta integration of the adiabatic lapse rate
/// (Fofonoff 1977).
pub fn potential_temperature(s: f64, t: f64, p: f64, pr: f64) -> f64 {
    if !(s.is_finite() && t.is_finite() && p.is_finite() && pr.is_finite()) {
        return f64::NAN;
    }
    let sqrt2 = std::f64::consts::SQRT_2;
    let del_p = pr - p;

    let mut del_th = del_p * adiabatic_gradient(s, t, p);
    let mut th = t * T68_SCALE + 0.5 * del_th;
    let mut q = del_th;

    del_th = del_p * adiabatic_gradient(s, th / T68_SCALE, p + 0.5 * del_p);
    th += (1.0 - 1.0 / sqrt2) * (del_th - q);
    q = (2.0 - sqrt2) * del_th + (-2.0 + 3.0 / sqrt2) * q;

    del_th = del_p * adiabatic_gradient(s, th / T68_SCALE, p + 0.5 * del_p);
    th += (1.0 + 1.0 / sqrt2) * (del_th - q);
    q = (2.0 + sqrt2) * del_th + (-2.0 - 3.0 / sqrt2) * q;

    del_th = del_p * adiabatic_gradient(s, th / T68_SCALE, p + del_p);
    (th + (del_th - 2.0 * q) / 6.0) / T68_SCALE
}

/// Potential density relative to reference pressure `pr` (kg/m^3)
pub fn potential_density(s: f64, t: f64, p: f64, pr: f64) -> f64 {
    density(s, potential_temperature(s, t, p, pr), pr)
}

/// Absolute salinity (g/kg) from practical salinity.
///
/// Reference-composition scaling; the regional salinity anomaly is below
/// glider sensor accuracy and is not modelled.
pub fn absolute_salinity(sp: f64) -> f64 {
    sp * SA_SCALE
}

/// Absolute salinity at a position (g/kg).
///
/// Keeps the SA(SP, p, lon, lat) calling convention of the reference
/// library; see [`absolute_salinity`] for the scaling actually applied.
pub fn absolute_salinity_at(sp: f64, _p: f64, _lon: f64, _lat: f64) -> f64 {
    absolute_salinity(sp)
}

/// Conservative temperature (deg C).
///
/// Served by potential temperature referenced to the surface; the difference
/// from the TEOS-10 definition is well under typical CTD accuracy.
pub fn conservative_temperature(s: f64, t: f64, p: f64) -> f64 {
    potential_temperature(s, t, p, 0.0)
}

/// Potential density (kg/m^3) from absolute salinity and conservative
/// temperature, referenced to the surface.
///
/// Mirrors the rho(SA, CT, 0) calling convention of the reference library;
/// the absolute salinity is mapped back to the practical scale for the
/// EOS-80 polynomial.
pub fn potential_density_from_ct(sa: f64, ct: f64) -> f64 {
    density(sa / SA_SCALE, ct, 0.0)
}

/// Height z (m, positive up) from pressure and latitude, UNESCO.
///
/// Ocean depth is `-z_from_p(p, lat)`.
pub fn z_from_p(p: f64, lat: f64) -> f64 {
    if !(p.is_finite() && lat.is_finite()) {
        return f64::NAN;
    }
    let x = (lat.to_radians().sin()).powi(2);
    let gravity = 9.780318 * (1.0 + (5.2788e-3 + 2.36e-5 * x) * x) + 1.092e-6 * p;
    let depth = ((((-1.82e-15 * p + 2.279e-10) * p - 2.2512e-5) * p + 9.72659) * p) / gravity;
    -depth
}
