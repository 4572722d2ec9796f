mod office;
mod specialty;
mod validation;

pub use office::{LogoSelection, MAX_LOGO_BYTES, OfficeFields, OfficeProfile};
pub use specialty::{ConfirmedDelete, NewSpecialty, PendingDelete, Specialty, SpecialtyId};
pub use validation::{ValidationError, logo_mime_type, validate_email, validate_specialty_name};
