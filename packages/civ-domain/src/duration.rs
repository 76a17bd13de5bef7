//! ISO-8601 durations as returned in YouTube `contentDetails.duration`, e.g. `PT1H2M30S`.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid ISO-8601 duration {raw:?}.")]
pub struct DurationError {
	pub raw: String,
}

pub fn parse_seconds(raw: &str) -> Result<f64, DurationError> {
	let invalid = || DurationError { raw: raw.to_string() };
	let body = raw.trim().strip_prefix('P').ok_or_else(invalid)?;

	if body.is_empty() {
		return Err(invalid());
	}

	let (date_part, time_part) = match body.split_once('T') {
		Some((_, "")) => return Err(invalid()),
		Some((date, time)) => (date, Some(time)),
		None => (body, None),
	};
	let mut seconds = 0.0;

	for (value, unit) in components(date_part).ok_or_else(invalid)? {
		seconds += value
			* match unit {
				'Y' => 365.0 * 86_400.0,
				'M' => 30.0 * 86_400.0,
				'W' => 7.0 * 86_400.0,
				'D' => 86_400.0,
				_ => return Err(invalid()),
			};
	}

	if let Some(time_part) = time_part {
		for (value, unit) in components(time_part).ok_or_else(invalid)? {
			seconds += value
				* match unit {
					'H' => 3_600.0,
					'M' => 60.0,
					'S' => 1.0,
					_ => return Err(invalid()),
				};
		}
	}

	Ok(seconds)
}

pub fn parse_minutes(raw: &str) -> Result<f64, DurationError> {
	Ok(parse_seconds(raw)? / 60.0)
}

fn components(part: &str) -> Option<Vec<(f64, char)>> {
	let mut out = Vec::new();
	let mut number = String::new();

	for c in part.chars() {
		if c.is_ascii_digit() || c == '.' || c == ',' {
			number.push(if c == ',' { '.' } else { c });

			continue;
		}
		if number.is_empty() {
			return None;
		}

		out.push((number.parse().ok()?, c));
		number.clear();
	}

	if !number.is_empty() {
		return None;
	}

	Some(out)
}
