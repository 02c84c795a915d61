// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the error types of the lifecycle bridge core.
//!
//! Both variants here are programming-contract violations rather than
//! runtime conditions: the engine loop treats them as fatal assertions in
//! debug builds and as logged, skipped operations in release builds.

use std::fmt;

/// An error raised by the surface binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingError {
    /// `bind` was called while another surface is still held. The caller
    /// must unbind first; rebinding goes through the dedicated path.
    AlreadyBound {
        /// Identifier of the surface currently held.
        held: u64,
        /// Identifier of the surface that was offered.
        offered: u64,
    },
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::AlreadyBound { held, offered } => {
                write!(
                    f,
                    "Surface {offered} offered while surface {held} is still bound; unbind first"
                )
            }
        }
    }
}

impl std::error::Error for BindingError {}

/// An error raised by the frame driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// A tick was attempted with no surface bound. Unreachable when the
    /// engine loop honors the lifecycle invariant.
    NoSurfaceBound,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::NoSurfaceBound => {
                write!(f, "Frame tick attempted with no surface bound")
            }
        }
    }
}

impl std::error::Error for DriverError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_error_display_names_both_surfaces() {
        let err = BindingError::AlreadyBound {
            held: 4,
            offered: 9,
        };
        assert_eq!(
            format!("{err}"),
            "Surface 9 offered while surface 4 is still bound; unbind first"
        );
    }

    #[test]
    fn driver_error_display() {
        assert_eq!(
            format!("{}", DriverError::NoSurfaceBound),
            "Frame tick attempted with no surface bound"
        );
    }
}
