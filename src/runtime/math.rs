use num_bigint::BigUint;
use num_traits::One;
use regex::Captures;

use super::{cap, cap_f64, cap_i64, rng};
use crate::context::ExecutionContext;
use crate::value::{fmt_num, RuntimeError};

impl ExecutionContext {
    pub(crate) fn add_numbers(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let a = cap_f64(caps, 1)?;
        let b = cap_f64(caps, 2)?;
        let result = a + b;
        self.emit(format!("{} + {} = {}", fmt_num(a), fmt_num(b), fmt_num(result)));
        Ok(format!("print({} + {})", fmt_num(a), fmt_num(b)))
    }

    /// "subtract X from Y" computes Y - X.
    pub(crate) fn subtract_numbers(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let a = cap_f64(caps, 2)?;
        let b = cap_f64(caps, 1)?;
        let result = a - b;
        self.emit(format!("{} - {} = {}", fmt_num(a), fmt_num(b), fmt_num(result)));
        Ok(format!("print({} - {})", fmt_num(a), fmt_num(b)))
    }

    pub(crate) fn multiply_numbers(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let a = cap_f64(caps, 1)?;
        let b = cap_f64(caps, 2)?;
        let result = a * b;
        self.emit(format!("{} * {} = {}", fmt_num(a), fmt_num(b), fmt_num(result)));
        Ok(format!("print({} * {})", fmt_num(a), fmt_num(b)))
    }

    pub(crate) fn divide_numbers(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let a = cap_f64(caps, 1)?;
        let b = cap_f64(caps, 2)?;
        if b == 0.0 {
            return Err(RuntimeError::new("Cannot divide by zero!"));
        }
        let result = a / b;
        self.emit(format!("{} / {} = {}", fmt_num(a), fmt_num(b), fmt_num(result)));
        Ok(format!("print({} / {})", fmt_num(a), fmt_num(b)))
    }

    pub(crate) fn square_root(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let number = cap_f64(caps, 1)?;
        if number < 0.0 {
            return Err(RuntimeError::new(
                "Cannot calculate square root of negative number!",
            ));
        }
        let result = number.sqrt();
        self.emit(format!("sqrt({}) = {}", fmt_num(number), fmt_num(result)));
        Ok(format!("print(sqrt({}))", fmt_num(number)))
    }

    pub(crate) fn power(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let base = cap_f64(caps, 1)?;
        let exponent = cap_f64(caps, 2)?;
        let result = base.powf(exponent);
        self.emit(format!(
            "{}^{} = {}",
            fmt_num(base),
            fmt_num(exponent),
            fmt_num(result)
        ));
        Ok(format!("print({} ^ {})", fmt_num(base), fmt_num(exponent)))
    }

    pub(crate) fn random_number(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let min = cap_i64(caps, 1)?;
        let max = cap_i64(caps, 2)?;
        if min > max {
            return Err(RuntimeError::new(format!(
                "Empty range: {} is greater than {}",
                min, max
            )));
        }
        let result = rng::random_in_range(min, max);
        self.emit(format!(
            "Random number between {} and {}: {}",
            min, max, result
        ));
        Ok(format!("print(random({}, {}))", min, max))
    }

    fn parse_int_series(values_str: &str) -> Result<Vec<i64>, RuntimeError> {
        values_str
            .split(',')
            .map(|v| {
                v.trim()
                    .parse::<i64>()
                    .map_err(|_| RuntimeError::new("Please provide comma-separated numbers"))
            })
            .collect()
    }

    fn fmt_int_series(values: &[i64]) -> String {
        let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        format!("[{}]", parts.join(", "))
    }

    pub(crate) fn find_minimum(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let values = Self::parse_int_series(cap(caps, 1))?;
        let result = values
            .iter()
            .min()
            .copied()
            .ok_or_else(|| RuntimeError::new("Please provide comma-separated numbers"))?;
        let shown = Self::fmt_int_series(&values);
        self.emit(format!("Minimum of {}: {}", shown, result));
        Ok(format!("print(min({}))", shown))
    }

    pub(crate) fn find_maximum(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let values = Self::parse_int_series(cap(caps, 1))?;
        let result = values
            .iter()
            .max()
            .copied()
            .ok_or_else(|| RuntimeError::new("Please provide comma-separated numbers"))?;
        let shown = Self::fmt_int_series(&values);
        self.emit(format!("Maximum of {}: {}", shown, result));
        Ok(format!("print(max({}))", shown))
    }

    pub(crate) fn calculate_average(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let values = Self::parse_int_series(cap(caps, 1))?;
        if values.is_empty() {
            return Err(RuntimeError::new("Please provide comma-separated numbers"));
        }
        let sum: i64 = values.iter().sum();
        let result = sum as f64 / values.len() as f64;
        let shown = Self::fmt_int_series(&values);
        self.emit(format!("Average of {}: {:.2}", shown, result));
        Ok(format!("print(avg({}))", shown))
    }

    pub(crate) fn round_number(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let number = cap_f64(caps, 1)?;
        let places = cap_i64(caps, 2)?.clamp(0, 12) as u32;
        let factor = 10f64.powi(places as i32);
        let result = (number * factor).round() / factor;
        self.emit(format!(
            "{} rounded to {} decimal places: {}",
            number,
            places,
            fmt_num(result)
        ));
        Ok(format!("print(round({}, {}))", number, places))
    }

    pub(crate) fn sine(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let angle = cap_f64(caps, 1)?;
        let result = angle.to_radians().sin();
        self.emit(format!("sin({}°) = {:.6}", fmt_num(angle), result));
        Ok(format!("print(sin({}))", fmt_num(angle)))
    }

    pub(crate) fn cosine(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let angle = cap_f64(caps, 1)?;
        let result = angle.to_radians().cos();
        self.emit(format!("cos({}°) = {:.6}", fmt_num(angle), result));
        Ok(format!("print(cos({}))", fmt_num(angle)))
    }

    pub(crate) fn tangent(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let angle = cap_f64(caps, 1)?;
        let result = angle.to_radians().tan();
        self.emit(format!("tan({}°) = {:.6}", fmt_num(angle), result));
        Ok(format!("print(tan({}))", fmt_num(angle)))
    }

    pub(crate) fn natural_log(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let number = cap_f64(caps, 1)?;
        if number <= 0.0 {
            return Err(RuntimeError::new(
                "Cannot calculate logarithm of zero or negative number!",
            ));
        }
        let result = number.ln();
        self.emit(format!("ln({}) = {:.6}", fmt_num(number), result));
        Ok(format!("print(ln({}))", fmt_num(number)))
    }

    pub(crate) fn log_base(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let base = cap_f64(caps, 1)?;
        let number = cap_f64(caps, 2)?;
        if number <= 0.0 || base <= 0.0 || base == 1.0 {
            return Err(RuntimeError::new("Invalid values for logarithm!"));
        }
        let result = number.ln() / base.ln();
        self.emit(format!(
            "log_{}({}) = {:.6}",
            fmt_num(base),
            fmt_num(number),
            result
        ));
        Ok(format!("print(log({}, {}))", fmt_num(number), fmt_num(base)))
    }

    pub(crate) fn absolute_value(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let number = cap_f64(caps, 1)?;
        let result = number.abs();
        self.emit(format!("|{}| = {}", fmt_num(number), fmt_num(result)));
        Ok(format!("print(abs({}))", fmt_num(number)))
    }

    pub(crate) fn factorial(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let number = cap_i64(caps, 1)?;
        if number < 0 {
            return Err(RuntimeError::new(
                "Cannot calculate factorial of negative number!",
            ));
        }
        if number > 100 {
            return Err(RuntimeError::new(
                "Number too large for factorial calculation!",
            ));
        }
        let mut result = BigUint::one();
        for i in 2..=(number as u64) {
            result *= i;
        }
        self.emit(format!("{}! = {}", number, result));
        Ok(format!("print(factorial({}))", number))
    }
}
