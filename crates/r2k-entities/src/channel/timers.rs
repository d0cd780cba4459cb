/// Handset has to identify on the traffic channel within this time
pub const IDENT_TIME: f64 = 3.0;
/// First batch of dialed digits
pub const DIAL1_TIME: f64 = 8.0;
/// Second batch, the number is taken as complete when it runs out
pub const DIAL2_TIME: f64 = 3.0;
pub const SUSPEND_TIME: f64 = 3.0;
/// Parked call waiting for the called party
pub const RECALL_TIME: f64 = 60.0;
pub const ALERT_TIME: f64 = 60.0;
/// Time until the first supervisory digit after the call is connected
pub const SUPER_INITIAL_TIME: f64 = 4.0;
/// Supervisory loss timeout, restarted by every valid digit
pub const SUPER_RUNNING_TIME: f64 = 10.0;
/// Release frames are repeated for this long
pub const RELEASE_TIME: f64 = 2.0;

/// Paging attempts before an incoming call is given up
pub const PAGE_TRIES: u8 = 2;
