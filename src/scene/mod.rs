pub(crate) mod composition;
pub(crate) mod plan;
