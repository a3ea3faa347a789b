//! Member DTOs

use crate::entities::{Address, Member};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct MemberDTO {
    pub member_id: i64,
    pub name: String,
    pub address: Address,
}

impl From<Member> for MemberDTO {
    fn from(value: Member) -> Self {
        Self {
            member_id: value.member_id,
            name: value.name,
            address: value.address,
        }
    }
}

/// DTO for registering a new member (id assigned by the database)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateMemberDTO {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub city: String,
    pub street: String,
    pub zipcode: String,
}

impl CreateMemberDTO {
    pub fn address(&self) -> Address {
        Address::new(self.city.clone(), self.street.clone(), self.zipcode.clone())
    }
}

/// DTO for partial member updates (only `Some(_)` fields are modified)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateMemberDTO {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
}
