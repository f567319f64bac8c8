//! Accessors the list and search components rely on, plus the [`Listing`] wrapper that carries
//! a resolved hospital name next to the record it belongs to.

use crate::doctor::Doctor;
use crate::hospital::Hospital;
use crate::treatment::Treatment;
use crate::EntityId;
use serde::Serialize;

/// Records with an optional star rating.
pub trait Rated {
    fn rating(&self) -> Option<f64>;
}

/// Records that reference a hospital by id.
pub trait HospitalLinked {
    fn hospital_id(&self) -> Option<EntityId>;
}

/// Records with a free-text location.
pub trait Located {
    fn location(&self) -> Option<&str>;
}

/// Records with a category used for dropdown filtering (specialization, treatment type).
pub trait Categorised {
    fn category(&self) -> Option<&str>;
}

impl Rated for Doctor {
    fn rating(&self) -> Option<f64> {
        self.rating
    }
}

impl HospitalLinked for Doctor {
    fn hospital_id(&self) -> Option<EntityId> {
        self.hospital_id
    }
}

impl Located for Doctor {
    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl Categorised for Doctor {
    fn category(&self) -> Option<&str> {
        self.specialization.as_deref()
    }
}

impl Rated for Treatment {
    fn rating(&self) -> Option<f64> {
        self.rating
    }
}

impl HospitalLinked for Treatment {
    fn hospital_id(&self) -> Option<EntityId> {
        self.hospital_id
    }
}

impl Located for Treatment {
    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl Categorised for Treatment {
    fn category(&self) -> Option<&str> {
        self.treatment_type.as_deref()
    }
}

impl Rated for Hospital {
    fn rating(&self) -> Option<f64> {
        self.rating
    }
}

impl Located for Hospital {
    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// A record as shown in a list view, with its hospital name once resolved.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Listing<T> {
    #[serde(flatten)]
    pub item: T,
    pub hospital_name: Option<String>,
}

impl<T> Listing<T> {
    pub fn new(item: T) -> Self {
        Self {
            item,
            hospital_name: None,
        }
    }
}

impl<T: Rated> Rated for Listing<T> {
    fn rating(&self) -> Option<f64> {
        self.item.rating()
    }
}

impl<T: HospitalLinked> HospitalLinked for Listing<T> {
    fn hospital_id(&self) -> Option<EntityId> {
        self.item.hospital_id()
    }
}

impl<T: Located> Located for Listing<T> {
    fn location(&self) -> Option<&str> {
        self.item.location()
    }
}

impl<T: Categorised> Categorised for Listing<T> {
    fn category(&self) -> Option<&str> {
        self.item.category()
    }
}
