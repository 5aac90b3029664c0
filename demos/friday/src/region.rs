//! The demo town: two restaurants, three neighborhoods, and the streets
//! between them.

use std::io::Cursor;
use std::sync::Arc;

use ds_core::Location;
use ds_region::{load_region_reader, Region, RegionResult};

// Durations are in ticks (1 tick = 1 minute).
const NODES_CSV: &str = "\
name,x,y,kind,food
Pizzeria Roma,0,0,restaurant,Margherita;Funghi;Diavola;Calzone
Noodle Bar,8,2,restaurant,Ramen;Pho;Udon
Old Town,-4,5,neighborhood,
Riverside,6,9,neighborhood,
Hillcrest,12,-3,neighborhood,
Market Square,3,4,node,
Station,7,-2,node,
";

const EDGES_CSV: &str = "\
name,ax,ay,bx,by,duration
Via Roma,0,0,3,4,4
Old Lane,-4,5,3,4,6
Bridge Road,3,4,6,9,5
Canal Street,3,4,8,2,4
Station Way,0,0,7,-2,6
Noodle Alley,7,-2,8,2,3
Hill Road,7,-2,12,-3,5
Riverside Drive,6,9,8,2,7
";

pub const PIZZERIA: Location = Location { x: 0, y: 0 };
pub const NOODLE_BAR: Location = Location { x: 8, y: 2 };

pub fn build_region() -> RegionResult<Arc<Region>> {
    load_region_reader(Cursor::new(NODES_CSV), Cursor::new(EDGES_CSV)).map(Arc::new)
}
