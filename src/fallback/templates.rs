//! Canned advisory texts used while no backend is reachable.

use super::Topic;
use crate::language::Language;

/// First line of every fallback text.
pub(super) fn demo_label(language: Language) -> &'static str {
    language.pick(
        "🔶 Demo mode (offline): sample advice, not a live AI answer.",
        "🔶 डेमो मोड (ऑफ़लाइन): यह नमूना सलाह है, लाइव एआई उत्तर नहीं।",
    )
}

pub(super) fn image_analysis(language: Language) -> &'static str {
    language.pick(IMAGE_EN, IMAGE_HI)
}

pub(super) fn overview(language: Language) -> &'static str {
    language.pick(OVERVIEW_EN, OVERVIEW_HI)
}

pub(super) fn topic(topic: Topic, language: Language) -> &'static str {
    match (topic, language) {
        (Topic::Wheat, Language::English) => WHEAT_EN,
        (Topic::Wheat, Language::Hindi) => WHEAT_HI,
        (Topic::Rice, Language::English) => RICE_EN,
        (Topic::Rice, Language::Hindi) => RICE_HI,
        (Topic::Pest, Language::English) => PEST_EN,
        (Topic::Pest, Language::Hindi) => PEST_HI,
        (Topic::Fertilizer, Language::English) => FERTILIZER_EN,
        (Topic::Fertilizer, Language::Hindi) => FERTILIZER_HI,
        (Topic::Irrigation, Language::English) => IRRIGATION_EN,
        (Topic::Irrigation, Language::Hindi) => IRRIGATION_HI,
        (Topic::Market, Language::English) => MARKET_EN,
        (Topic::Market, Language::Hindi) => MARKET_HI,
        (Topic::Weather, Language::English) => WEATHER_EN,
        (Topic::Weather, Language::Hindi) => WEATHER_HI,
    }
}

const IMAGE_EN: &str = "📸 **Image Analysis Results**

I've analyzed your crop image. Based on the visual examination:

**Detected:** Possible plant stress indicators
**Confidence:** 78%

**Recommendations:**
• Check soil moisture levels
• Inspect for pest damage
• Consider nutrient deficiency testing
• Monitor plant health daily

**Next Steps:**
• Apply balanced fertilizer if needed
• Ensure proper irrigation
• Remove any diseased parts
• Consult local agricultural expert for detailed diagnosis

*Note: This is a demo analysis. For accurate diagnosis, please consult agricultural experts.*";

const IMAGE_HI: &str = "📸 **छवि विश्लेषण परिणाम**

आपकी फसल की छवि का दृश्य परीक्षण किया गया:

**पाया गया:** पौधे में तनाव के संभावित संकेत
**विश्वास स्तर:** 78%

**सुझाव:**
• मिट्टी की नमी जाँचें
• कीट क्षति का निरीक्षण करें
• पोषक तत्वों की कमी की जाँच कराएँ
• पौधों की प्रतिदिन निगरानी करें

**अगले कदम:**
• आवश्यकता हो तो संतुलित उर्वरक डालें
• उचित सिंचाई सुनिश्चित करें
• रोगग्रस्त भाग हटा दें
• विस्तृत निदान के लिए स्थानीय कृषि विशेषज्ञ से सलाह लें

*नोट: यह डेमो विश्लेषण है। सटीक निदान के लिए कृषि विशेषज्ञ से संपर्क करें।*";

const WHEAT_EN: &str = "🌾 **Wheat Cultivation Guide:**

**Current Season Advice:**
• **Sowing Time:** October-December (Rabi season)
• **Varieties:** HD-2967, PBW-343, WH-147
• **Seed Rate:** 100-125 kg/hectare

**Fertilizer Schedule:**
• **Basal:** 60kg DAP + 30kg MOP per acre
• **Top dressing:** 45kg Urea after 25-30 days
• **Second dose:** 45kg Urea at flowering

**Irrigation:** 4-6 times depending on soil and weather
**Harvest:** April-May when grains are golden

**Current Market Rate:** ₹2,150/quintal";

const WHEAT_HI: &str = "🌾 **गेहूं खेती मार्गदर्शिका:**

**इस मौसम की सलाह:**
• **बुआई का समय:** अक्टूबर-दिसंबर (रबी मौसम)
• **किस्में:** HD-2967, PBW-343, WH-147
• **बीज दर:** 100-125 किग्रा/हेक्टेयर

**उर्वरक अनुसूची:**
• **आधार खुराक:** 60 किग्रा DAP + 30 किग्रा MOP प्रति एकड़
• **टॉप ड्रेसिंग:** 25-30 दिन बाद 45 किग्रा यूरिया
• **दूसरी खुराक:** फूल आने पर 45 किग्रा यूरिया

**सिंचाई:** मिट्टी और मौसम के अनुसार 4-6 बार
**कटाई:** अप्रैल-मई, जब दाने सुनहरे हों

**वर्तमान बाजार भाव:** ₹2,150/क्विंटल";

const RICE_EN: &str = "🌾 **Rice Cultivation Guide:**

**Varieties for Current Season:**
• **Kharif:** IR-64, Swarna, MTU-7029
• **Duration:** 120-140 days
• **Yield Potential:** 6-8 tons/hectare

**Water Management:**
• **Nursery:** 25-30 days old seedlings
• **Transplanting:** June-July
• **Water depth:** 2-5 cm throughout season

**Nutrient Management:**
• **Nitrogen:** 150 kg/hectare (split dose)
• **Phosphorus:** 75 kg/hectare (basal)
• **Potassium:** 75 kg/hectare

**Pest Alert:** Monitor for stem borer and leaf folder";

const RICE_HI: &str = "🌾 **धान खेती मार्गदर्शिका:**

**इस मौसम की किस्में:**
• **खरीफ:** IR-64, स्वर्णा, MTU-7029
• **अवधि:** 120-140 दिन
• **उपज क्षमता:** 6-8 टन/हेक्टेयर

**जल प्रबंधन:**
• **नर्सरी:** 25-30 दिन पुराने पौधे
• **रोपाई:** जून-जुलाई
• **पानी की गहराई:** पूरे मौसम 2-5 सेमी

**पोषक तत्व प्रबंधन:**
• **नाइट्रोजन:** 150 किग्रा/हेक्टेयर (विभाजित खुराक)
• **फास्फोरस:** 75 किग्रा/हेक्टेयर (आधार)
• **पोटाश:** 75 किग्रा/हेक्टेयर

**कीट चेतावनी:** तना छेदक और पत्ती लपेटक पर नज़र रखें";

const PEST_EN: &str = "🐛 **Integrated Pest Management:**

**Current Pest Alerts:**
• **Aphids:** Use yellow sticky traps
• **Bollworm:** Apply Bt spray
• **Whitefly:** Neem oil application

**Organic Solutions:**
• **Neem oil:** 2ml/liter water
• **Tobacco decoction:** Natural pesticide
• **Marigold:** Companion planting

**Chemical Control (if needed):**
• **Imidacloprid:** For sucking pests
• **Chlorpyrifos:** For soil insects
• **Always follow label instructions**

**Prevention:**
• Regular field monitoring
• Crop rotation
• Beneficial insects conservation";

const PEST_HI: &str = "🐛 **एकीकृत कीट प्रबंधन:**

**वर्तमान कीट चेतावनी:**
• **माहू (एफिड्स):** पीले चिपचिपे जाल लगाएँ
• **सुंडी (बॉलवर्म):** Bt स्प्रे करें
• **सफेद मक्खी:** नीम तेल का छिड़काव करें

**जैविक उपाय:**
• **नीम तेल:** 2 मिली/लीटर पानी
• **तंबाकू का काढ़ा:** प्राकृतिक कीटनाशक
• **गेंदा:** सहफसली रोपण

**रासायनिक नियंत्रण (आवश्यक होने पर):**
• **इमिडाक्लोप्रिड:** रस चूसने वाले कीटों के लिए
• **क्लोरपाइरीफॉस:** मिट्टी के कीटों के लिए
• **हमेशा लेबल निर्देशों का पालन करें**

**रोकथाम:**
• खेत की नियमित निगरानी
• फसल चक्र
• लाभकारी कीटों का संरक्षण";

const FERTILIZER_EN: &str = "🧪 **Fertilizer Management Guide:**

**Soil Testing First!**
• Test N-P-K levels
• Check pH (6.0-7.5 optimal)
• Organic matter content

**Fertilizer Schedule:**
• **Organic:** 5-10 tons FYM/hectare
• **Chemical:** Based on soil test
• **Micronutrients:** Zinc, Boron as needed

**Application Tips:**
• Apply during cool hours
• Ensure soil moisture
• Don't apply before rain
• Mix with soil properly

**Current Prices:**
• Urea: ₹266/bag
• DAP: ₹1,350/bag
• NPK: ₹1,280/bag";

const FERTILIZER_HI: &str = "🧪 **उर्वरक प्रबंधन मार्गदर्शिका:**

**पहले मिट्टी की जाँच!**
• N-P-K स्तर जाँचें
• pH जाँचें (6.0-7.5 उत्तम)
• जैविक पदार्थ की मात्रा

**उर्वरक अनुसूची:**
• **जैविक:** 5-10 टन गोबर खाद/हेक्टेयर
• **रासायनिक:** मिट्टी परीक्षण के अनुसार
• **सूक्ष्म पोषक तत्व:** आवश्यकतानुसार जिंक, बोरॉन

**प्रयोग के सुझाव:**
• ठंडे समय में डालें
• मिट्टी में नमी सुनिश्चित करें
• बारिश से पहले न डालें
• मिट्टी में अच्छी तरह मिलाएँ

**वर्तमान मूल्य:**
• यूरिया: ₹266/बोरी
• DAP: ₹1,350/बोरी
• NPK: ₹1,280/बोरी";

const IRRIGATION_EN: &str = "💧 **Smart Irrigation Management:**

**Current Weather:** Good for irrigation
**Soil Moisture:** Check with finger test

**Scheduling:**
• **Wheat:** Every 15-20 days
• **Rice:** Continuous standing water
• **Vegetables:** Every 2-3 days

**Water Saving Techniques:**
• **Drip irrigation:** 40-60% water saving
• **Mulching:** Reduces evaporation
• **Sprinkler:** Good for field crops

**Best Timing:**
• **Morning:** 6-8 AM
• **Evening:** 5-7 PM
• **Avoid:** Mid-day irrigation

**Water Quality:** Check salinity levels";

const IRRIGATION_HI: &str = "💧 **स्मार्ट सिंचाई प्रबंधन:**

**वर्तमान मौसम:** सिंचाई के लिए उपयुक्त
**मिट्टी की नमी:** उंगली से जाँचें

**समय-सारणी:**
• **गेहूं:** हर 15-20 दिन
• **धान:** लगातार खड़ा पानी
• **सब्ज़ियाँ:** हर 2-3 दिन

**पानी बचाने की तकनीकें:**
• **ड्रिप सिंचाई:** 40-60% पानी की बचत
• **मल्चिंग:** वाष्पीकरण कम करती है
• **स्प्रिंकलर:** खेत की फसलों के लिए अच्छा

**सबसे अच्छा समय:**
• **सुबह:** 6-8 बजे
• **शाम:** 5-7 बजे
• **बचें:** दोपहर की सिंचाई से

**पानी की गुणवत्ता:** लवणता की जाँच करें";

const MARKET_EN: &str = "💰 **Current Market Prices:**

**Grains (per quintal):**
• Wheat: ₹2,150
• Rice: ₹1,850
• Corn: ₹1,750
• Barley: ₹1,650

**Vegetables (per kg):**
• Tomato: ₹25-35
• Onion: ₹30-40
• Potato: ₹15-25
• Cauliflower: ₹20-30

**Cash Crops:**
• Cotton: ₹6,200/quintal
• Sugarcane: ₹350/quintal

**Tips:**
• Check daily rates
• Plan harvesting accordingly
• Consider storage options";

const MARKET_HI: &str = "💰 **वर्तमान बाजार भाव:**

**अनाज (प्रति क्विंटल):**
• गेहूं: ₹2,150
• धान: ₹1,850
• मक्का: ₹1,750
• जौ: ₹1,650

**सब्ज़ियाँ (प्रति किग्रा):**
• टमाटर: ₹25-35
• प्याज: ₹30-40
• आलू: ₹15-25
• फूलगोभी: ₹20-30

**नकदी फसलें:**
• कपास: ₹6,200/क्विंटल
• गन्ना: ₹350/क्विंटल

**सुझाव:**
• रोज़ाना भाव देखें
• उसी अनुसार कटाई की योजना बनाएँ
• भंडारण के विकल्पों पर विचार करें";

const WEATHER_EN: &str = "🌤️ **Weather Advisory:**

• Check the local forecast before spraying or irrigating
• Postpone fertilizer application if rain is expected within 24 hours
• Drain standing water after heavy rain to protect roots
• Humid, warm spells raise fungal disease risk; scout fields closely

**Tip:** Plan field operations around the forecast, not the calendar.";

const WEATHER_HI: &str = "🌤️ **मौसम सलाह:**

• छिड़काव या सिंचाई से पहले स्थानीय पूर्वानुमान देखें
• 24 घंटे में बारिश की संभावना हो तो उर्वरक डालना टालें
• भारी बारिश के बाद जड़ों की रक्षा के लिए रुका पानी निकालें
• नम और गर्म मौसम में फफूंद रोग का खतरा बढ़ता है; खेत की बारीकी से निगरानी करें

**सुझाव:** खेत के काम कैलेंडर नहीं, पूर्वानुमान के अनुसार तय करें।";

const OVERVIEW_EN: &str = "🌾 **AgriSakha Assistant:**

I'm here to help with your agricultural needs! You can ask me about:

🌱 **Crop Management**
• Sowing schedules and varieties
• Fertilizer recommendations
• Irrigation planning

🐛 **Pest & Disease Control**
• Identification and treatment
• Organic solutions
• Prevention strategies

💰 **Market Information**
• Current prices
• Market trends
• Best selling times

🌤️ **Weather Advisory**
• Irrigation planning
• Pest forecasting
• Field operations

📷 **Image Analysis**
• Upload crop photos for diagnosis
• Disease identification
• Treatment recommendations

Feel free to ask specific questions or upload crop images for analysis!";

const OVERVIEW_HI: &str = "🌾 **एग्रीसखा सहायक:**

मैं आपकी खेती से जुड़ी ज़रूरतों में मदद के लिए हूँ! आप मुझसे पूछ सकते हैं:

🌱 **फसल प्रबंधन**
• बुआई का समय और किस्में
• उर्वरक सुझाव
• सिंचाई योजना

🐛 **कीट और रोग नियंत्रण**
• पहचान और उपचार
• जैविक उपाय
• रोकथाम के तरीके

💰 **बाजार जानकारी**
• वर्तमान भाव
• बाजार रुझान
• बेचने का सही समय

🌤️ **मौसम सलाह**
• सिंचाई योजना
• कीट पूर्वानुमान
• खेत के काम

📷 **छवि विश्लेषण**
• निदान के लिए फसल की फोटो भेजें
• रोग की पहचान
• उपचार सुझाव

विशिष्ट प्रश्न पूछें या विश्लेषण के लिए फसल की तस्वीरें भेजें!";
