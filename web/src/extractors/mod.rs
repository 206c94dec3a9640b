pub(crate) mod authenticated_person;
pub(crate) mod bearer_token;
