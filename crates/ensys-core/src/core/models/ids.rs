use slotmap::new_key_type;

new_key_type! {
    pub struct CommodityId;
    pub struct LocationId;
    pub struct LinkageId;
    pub struct PeriodsId;
    pub struct OperationId;
}
