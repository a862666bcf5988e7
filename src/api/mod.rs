pub mod pricecontrol;
