//! Public types for the registry API.

mod common;
mod enhet;
mod kodeverk;
mod oppdateringer;
mod page;
mod query;
mod roller;
mod underenhet;

pub use common::{Adresse, Kode, Link, Links};
pub use enhet::{Enhet, EnhetOppslag, SlettetEnhet};
pub use kodeverk::{Kommune, Organisasjonsform};
pub use oppdateringer::{Oppdatering, RolleOppdatering};
pub use page::{Enheter, HalPage, Oppdateringer, PageInfo, Underenheter, decode_list};
pub use query::{EnhetQuery, MatrikkelQuery, OppdateringQuery, UnderenhetQuery, query_params};
pub use roller::{Personnavn, Rolle, RolleEnhet, RollePerson, Rollegruppe, Roller};
pub use underenhet::{SlettetUnderenhet, Underenhet, UnderenhetOppslag};
