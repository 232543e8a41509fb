use std::path::Path;
use std::str::FromStr;

use crate::core::alphabet::Alphabet;

pub fn path(rawpath: &str) -> Result<(), String> {
    let path = Path::new(&rawpath);
    if !path.exists() {
        Err(format!("{} file doesn't exist or there is no permission to read it", rawpath))
    } else {
        Ok(())
    }
}

pub fn writable(rawpath: &str) -> Result<(), String> {
    let path = Path::new(&rawpath);
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(format!("Path {} is not writable: {} is not a directory", rawpath, parent.display()))
        }
        _ => Ok(()),
    }
}

pub fn alphabet(alphabet: &str) -> Result<(), String> {
    Alphabet::from_str(alphabet).map(|_| ()).map_err(|x| x.to_string())
}

pub fn numeric<T>(low: T, upper: T) -> impl Fn(&str) -> Result<(), String>
where
    T: FromStr + std::fmt::Display + std::cmp::PartialOrd + Sized,
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    move |val: &str| -> Result<(), String> {
        let integer = match val.parse::<T>() {
            Ok(x) => x,
            Err(_) => return Err(format!("failed to parse {}", val)),
        };

        if integer < low || integer > upper {
            return Err(format!("Value {} is expected to be inside [{}, {}] range", val, low, upper));
        }
        Ok(())
    }
}
