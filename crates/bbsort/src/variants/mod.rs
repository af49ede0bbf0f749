pub(crate) mod counting;
pub(crate) mod dictless;
pub(crate) mod minmax_list;
